use criterion::{black_box, criterion_group, criterion_main, Criterion};
use molfp_chem::{
    add_explicit_hydrogens, maccs_fingerprint, morgan_counts, morgan_fingerprint, parse_smiles,
    MhfpEncoder, Molecule,
};

/// Drug-like molecules, including the ones in the bundled test dataset.
const SMILES_SET: &[&str] = &[
    "CCCC",
    "CO",
    "ON(c1ccccc1)C(=O)c2ccc(Cl)cc2Cl",
    "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",     // caffeine
    "CC(=O)Oc1ccccc1C(=O)O",            // aspirin
    "CC12CCC3C(C1CCC2O)CCC4=CC(=O)CCC34C", // testosterone
    "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O",    // ibuprofen
    "CC(=O)NC1=CC=C(C=C1)O",            // acetaminophen
    "c1ccc2ccccc2c1",                   // naphthalene
    "c1cc[nH]c1",                       // pyrrole
];

fn hydrogenated_1k() -> Vec<Molecule> {
    SMILES_SET
        .iter()
        .filter_map(|s| parse_smiles(s).ok())
        .map(|m| add_explicit_hydrogens(&m))
        .cycle()
        .take(1000)
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let smiles_1k: Vec<&str> = SMILES_SET.iter().copied().cycle().take(1000).collect();

    group.bench_function("1k_mols_with_hydrogens", |b| {
        b.iter(|| {
            for &smi in black_box(&smiles_1k) {
                if let Ok(mol) = parse_smiles(smi) {
                    black_box(add_explicit_hydrogens(&mol));
                }
            }
        })
    });

    group.finish();
}

fn bench_descriptors(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptors");
    let mols = hydrogenated_1k();
    let encoder = MhfpEncoder::new(2048);

    group.bench_function("ecfp_r2_2048", |b| {
        b.iter(|| {
            for mol in black_box(&mols) {
                black_box(morgan_fingerprint(mol, 2, 2048));
            }
        })
    });
    group.bench_function("ecfc_r2_2048", |b| {
        b.iter(|| {
            for mol in black_box(&mols) {
                black_box(morgan_counts(mol, 2, 2048));
            }
        })
    });
    group.bench_function("maccs", |b| {
        b.iter(|| {
            for mol in black_box(&mols) {
                black_box(maccs_fingerprint(mol));
            }
        })
    });
    group.sample_size(10);
    group.bench_function("secfp_r3_2048", |b| {
        b.iter(|| {
            for mol in black_box(&mols[..100]) {
                black_box(encoder.secfp_minhash(mol, 3, 2048));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_descriptors);
criterion_main!(benches);
