use std::sync::Arc;

use ckks::{
    Ciphertext, Encoder, Encryptor, Evaluator, KeyGenerator, Parameters, Plaintext,
    RelinearizationKey, RotationKey,
};
use criterion::{Criterion, criterion_group, criterion_main};

const DELTA: f64 = (1u64 << 30) as f64;

struct Setup {
    evaluator: Evaluator,
    relin_key: RelinearizationKey,
    rotation_key: RotationKey,
    a: Ciphertext,
    b: Ciphertext,
}

fn setup(log_n: usize) -> Setup {
    let n: usize = 1 << log_n;
    let params: Arc<Parameters> =
        Arc::new(Parameters::with_uniform_chain(n, 60, 30, 8, 400, DELTA).unwrap());
    let mut keygen: KeyGenerator = KeyGenerator::from_seed(params.clone(), [0u8; 32]).unwrap();
    let relin_key: RelinearizationKey = keygen.generate_relin_key().unwrap();
    let rotation_key: RotationKey = keygen.generate_rotation_key(1).unwrap();
    let encoder: Encoder = Encoder::new(params.clone()).unwrap();
    let mut encryptor: Encryptor =
        Encryptor::from_seed(params.clone(), keygen.public_key(), [1u8; 32]);
    let values: Vec<f64> = (0..n / 2).map(|i| i as f64 / n as f64).collect();
    let pt: Plaintext = encoder.encode_real(&values, DELTA).unwrap();
    let a: Ciphertext = encryptor.encrypt(&pt).unwrap();
    let b: Ciphertext = encryptor.encrypt(&pt).unwrap();
    Setup {
        evaluator: Evaluator::new(params),
        relin_key,
        rotation_key,
        a,
        b,
    }
}

fn evaluator(c: &mut Criterion) {
    let mut group: criterion::BenchmarkGroup<'_, criterion::measurement::WallTime> =
        c.benchmark_group("evaluator");
    for log_n in [3usize, 5] {
        let s: Setup = setup(log_n);
        let n: usize = 1 << log_n;

        group.bench_function(format!("multiply/n={}", n), |b| {
            b.iter(|| s.evaluator.multiply(&s.a, &s.b, &s.relin_key).unwrap())
        });
        group.bench_function(format!("rotate/n={}", n), |b| {
            b.iter(|| s.evaluator.rotate(&s.a, 1, &s.rotation_key).unwrap())
        });
        group.bench_function(format!("rescale/n={}", n), |b| {
            b.iter(|| s.evaluator.rescale(&s.a).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, evaluator);
criterion_main!(benches);
