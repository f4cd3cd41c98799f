use criterion::{criterion_group, criterion_main, Criterion};

use sha256_witness::{check_constraints, BitwiseBackend, Sha256};

fn bench(name: &str, input_len: usize, c: &mut Criterion) {
    let test_input = vec![0u8; input_len];

    let native = Sha256::new();
    c.bench_function(&format!("{}-digest", name), |b| {
        b.iter(|| native.digest(&test_input).unwrap());
    });

    let bitwise = Sha256::with_backend(BitwiseBackend);
    c.bench_function(&format!("{}-digest-bitwise", name), |b| {
        b.iter(|| bitwise.digest(&test_input).unwrap());
    });

    let witness = native.witness(&test_input).unwrap();
    c.bench_function(&format!("{}-check-constraints", name), |b| {
        b.iter(|| check_constraints(&witness).unwrap());
    });
}

fn criterion_benchmark(c: &mut Criterion) {
    bench("sha256-1block", 55, c);
    bench("sha256-9block", 567, c);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
