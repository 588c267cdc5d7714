use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use molfp::{EcfcParams, EcfpParams, FingerprintGenerator, SecfpParams};

const SMILES_SET: &[&str] = &[
    "CCCC",
    "CO",
    "ON(c1ccccc1)C(=O)c2ccc(Cl)cc2Cl",
    "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",
    "CC(=O)Oc1ccccc1C(=O)O",
    "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O",
    "c1ccc2ccccc2c1",
    "XXXX",
];

fn input(n: usize) -> Vec<&'static str> {
    SMILES_SET.iter().copied().cycle().take(n).collect()
}

fn bench_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoders");
    group.sample_size(10);
    let generator = FingerprintGenerator::new();

    for &n in &[100, 1000] {
        let smiles = input(n);
        group.bench_with_input(BenchmarkId::new("ecfp", n), &smiles, |b, s| {
            b.iter(|| black_box(generator.encode_ecfp(s, EcfpParams::default())))
        });
        group.bench_with_input(BenchmarkId::new("ecfc", n), &smiles, |b, s| {
            b.iter(|| black_box(generator.encode_ecfc(s, EcfcParams::default())))
        });
        group.bench_with_input(BenchmarkId::new("maccs", n), &smiles, |b, s| {
            b.iter(|| black_box(generator.encode_maccs(s)))
        });
        group.bench_with_input(BenchmarkId::new("secfp", n), &smiles, |b, s| {
            b.iter(|| black_box(generator.encode_secfp(s, SecfpParams::default())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encoders);
criterion_main!(benches);
