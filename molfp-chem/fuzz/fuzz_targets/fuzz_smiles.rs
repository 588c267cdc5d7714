#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(mol) = molfp_chem::parse_smiles(data) {
        let mol = molfp_chem::add_explicit_hydrogens(&mol);
        let _ = molfp_chem::morgan_fingerprint(&mol, 2, 256);
        let _ = molfp_chem::morgan_counts(&mol, 2, 256);
        let _ = molfp_chem::maccs_fingerprint(&mol);
        let _ = molfp_chem::MhfpEncoder::new(32).secfp_minhash(&mol, 3, 256);
    }
});
