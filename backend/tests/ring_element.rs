use backend::gadget::Gadget;
use backend::modulus::ModulusChain;
use backend::poly::RingElement;
use backend::ring::Ring;
use itertools::izip;
use num_bigint::BigInt;
use num_traits::One;
use sampling::source::Source;

#[test]
fn ring_element() {
    let n: usize = 1 << 4;
    let pow2 = |k: usize| BigInt::one() << k;
    let chain: ModulusChain =
        ModulusChain::new(vec![pow2(40), pow2(30), pow2(30)], pow2(120)).unwrap();
    let ring: Ring = Ring::new(n, chain).unwrap();

    sub_test("test_automorphism_is_ring_homomorphism", || {
        test_automorphism_is_ring_homomorphism(&ring)
    });

    sub_test("test_mod_switch_divides_by_dropped_modulus", || {
        test_mod_switch_divides_by_dropped_modulus(&ring)
    });

    sub_test("test_gadget_decomposition::<switching_modulus>", || {
        test_gadget_decomposition(&ring)
    });
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn test_automorphism_is_ring_homomorphism(ring: &Ring) {
    let mut source: Source = Source::new([0u8; 32]);
    let level: usize = ring.max_level();
    let a: RingElement = ring.uniform(level, &mut source).unwrap();
    let b: RingElement = ring.uniform(level, &mut source).unwrap();

    [1usize, 2, 3, 5].iter().for_each(|step| {
        let perm = ring.rotation_permutation(*step).unwrap();
        let lhs: RingElement = a.multiply(&b).unwrap().automorphism(&perm).unwrap();
        let rhs: RingElement = a
            .automorphism(&perm)
            .unwrap()
            .multiply(&b.automorphism(&perm).unwrap())
            .unwrap();
        assert_eq!(lhs, rhs, "step={}", step);

        let lhs: RingElement = a.add(&b).unwrap().automorphism(&perm).unwrap();
        let rhs: RingElement = a
            .automorphism(&perm)
            .unwrap()
            .add(&b.automorphism(&perm).unwrap())
            .unwrap();
        assert_eq!(lhs, rhs, "step={}", step);
    });

    let conj = ring.conjugation_permutation().unwrap();
    let twice: RingElement = a
        .automorphism(&conj)
        .unwrap()
        .automorphism(&conj)
        .unwrap();
    assert_eq!(twice, a);
}

fn test_mod_switch_divides_by_dropped_modulus(ring: &Ring) {
    let chain: &ModulusChain = ring.chain();
    let m: Vec<i64> = (0..ring.n() as i64).map(|i| i * 37 - 200).collect();
    let e: Vec<i64> = (0..ring.n() as i64).map(|i| (i % 5) - 2).collect();
    let q2: BigInt = chain.modulus(2).unwrap().clone();

    let scaled: RingElement = ring
        .from_i64(&m, 2)
        .unwrap()
        .scalar_multiply(&q2)
        .add_small(&e)
        .unwrap();
    let switched: RingElement = scaled.mod_switch(chain, 1).unwrap();
    assert_eq!(switched.level(), 1);
    assert_eq!(switched.modulus(), chain.level_modulus(1).unwrap());
    assert_eq!(switched, ring.from_i64(&m, 1).unwrap());

    assert!(switched.mod_switch(chain, 2).is_err());
}

fn test_gadget_decomposition(ring: &Ring) {
    let mut source: Source = Source::new([1u8; 32]);
    let level: usize = ring.max_level();
    let a: RingElement = ring.uniform(level, &mut source).unwrap();
    let switching: BigInt = ring.chain().switching_modulus(level).unwrap();

    [7usize, 16, 60].iter().for_each(|base_bits| {
        let gadget: Gadget = Gadget::new(*base_bits).unwrap();
        let digits: usize = gadget.digits(a.modulus());
        let d: Vec<RingElement> = gadget.decompose(&a, digits, &switching);
        assert!(d.iter().all(|di| di.modulus() == &switching));
        izip!(gadget.recompose(&d), a.centered()).for_each(|(x, y)| assert_eq!(x, y));
    });
}
