use backend::modulus::ModulusChain;
use backend::poly::RingElement;
use backend::ring::Ring;
use criterion::{Criterion, criterion_group, criterion_main};
use num_bigint::BigInt;
use num_traits::One;
use sampling::source::Source;

fn multiply(c: &mut Criterion) {
    fn runner(ring: Ring) -> Box<dyn FnMut()> {
        let mut source: Source = Source::new([0u8; 32]);
        let level: usize = ring.max_level();
        let a: RingElement = ring.uniform(level, &mut source).unwrap();
        let b: RingElement = ring.uniform(level, &mut source).unwrap();
        Box::new(move || {
            criterion::black_box(a.multiply(&b).unwrap());
        })
    }

    let mut b: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("ring_element_multiply");
    for log_n in 3..8 {
        let n: usize = 1 << log_n;
        let moduli: Vec<BigInt> = std::iter::once(BigInt::one() << 60usize)
            .chain((0..8).map(|_| BigInt::one() << 30usize))
            .collect();
        let chain: ModulusChain = ModulusChain::new(moduli, BigInt::one() << 400usize).unwrap();
        let ring: Ring = Ring::new(n, chain).unwrap();

        let runners = [(format!("n={}/level={}", n, ring.max_level()), {
            runner(ring)
        })];

        for (name, mut runner) in runners {
            b.bench_with_input(name, &(), |b, _| b.iter(&mut runner));
        }
    }
}

fn mod_switch(c: &mut Criterion) {
    let n: usize = 1 << 6;
    let moduli: Vec<BigInt> = std::iter::once(BigInt::one() << 60usize)
        .chain((0..8).map(|_| BigInt::one() << 30usize))
        .collect();
    let chain: ModulusChain = ModulusChain::new(moduli, BigInt::one() << 400usize).unwrap();
    let ring: Ring = Ring::new(n, chain).unwrap();
    let mut source: Source = Source::new([0u8; 32]);
    let level: usize = ring.max_level();
    let a: RingElement = ring.uniform(level, &mut source).unwrap();

    c.bench_function("ring_element_mod_switch", |b| {
        b.iter(|| a.mod_switch(ring.chain(), level - 1).unwrap())
    });
}

criterion_group!(benches, multiply, mod_switch);
criterion_main!(benches);
