//! Chemistry capabilities consumed by the fingerprint encoders.
//!
//! The encoders only see molecules through [`ChemEngine`]: parse, add
//! hydrogens, compute a descriptor. [`GraphEngine`] implements it on top of
//! `molfp-chem`; tests substitute a fake.

use molfp_chem::{
    add_explicit_hydrogens, maccs_fingerprint, morgan_counts, morgan_fingerprint, parse_smiles,
    MhfpEncoder, Molecule,
};
use molfp_core::Result;

/// Parsing and descriptor capabilities of a chemistry toolkit.
pub trait ChemEngine: Sync {
    /// Parsed molecule handle, owned by a single row of an encoding run.
    type Molecule;
    /// MinHash encoder shared read-only by every row of a SECFP run.
    type MinHasher: Sync;

    /// Parse a SMILES string. Any failure means the row becomes a placeholder.
    fn parse(&self, smiles: &str) -> Result<Self::Molecule>;

    fn add_explicit_hydrogens(&self, mol: Self::Molecule) -> Self::Molecule;

    /// Morgan fingerprint of `radius` hashed to `width` positions, as 0/1 bits
    /// or as per-position counts.
    fn circular_fingerprint(
        &self,
        mol: &Self::Molecule,
        radius: usize,
        width: usize,
        as_counts: bool,
    ) -> Vec<u32>;

    /// The 167-position MACCS key vector.
    fn maccs_keys(&self, mol: &Self::Molecule) -> Vec<u32>;

    fn minhash_encoder(&self, n_permutations: usize) -> Self::MinHasher;

    /// MinHash fingerprint with one value per permutation of `encoder`.
    fn minhash_fingerprint(
        &self,
        encoder: &Self::MinHasher,
        mol: &Self::Molecule,
        radius: usize,
        length: usize,
    ) -> Vec<u32>;
}

/// Engine backed by the pure-Rust molecular graph toolkit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphEngine;

impl ChemEngine for GraphEngine {
    type Molecule = Molecule;
    type MinHasher = MhfpEncoder;

    fn parse(&self, smiles: &str) -> Result<Molecule> {
        parse_smiles(smiles)
    }

    fn add_explicit_hydrogens(&self, mol: Molecule) -> Molecule {
        add_explicit_hydrogens(&mol)
    }

    fn circular_fingerprint(
        &self,
        mol: &Molecule,
        radius: usize,
        width: usize,
        as_counts: bool,
    ) -> Vec<u32> {
        if as_counts {
            morgan_counts(mol, radius, width)
        } else {
            morgan_fingerprint(mol, radius, width).to_vec()
        }
    }

    fn maccs_keys(&self, mol: &Molecule) -> Vec<u32> {
        maccs_fingerprint(mol).to_vec()
    }

    fn minhash_encoder(&self, n_permutations: usize) -> MhfpEncoder {
        MhfpEncoder::new(n_permutations)
    }

    fn minhash_fingerprint(
        &self,
        encoder: &MhfpEncoder,
        mol: &Molecule,
        radius: usize,
        length: usize,
    ) -> Vec<u32> {
        encoder.secfp_minhash(mol, radius, length)
    }
}
