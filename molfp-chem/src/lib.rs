//! Molecular graph toolkit backing the molfp fingerprint encoders.
//!
//! Provides SMILES parsing with valence checks and aromaticity perception,
//! explicit-hydrogen handling, Morgan (ECFP/ECFC) fingerprints, MACCS keys
//! and MinHash (MHFP/SECFP) signatures.
//!
//! # Example
//!
//! ```
//! use molfp_chem::{add_explicit_hydrogens, parse_smiles, morgan_fingerprint, tanimoto_similarity};
//!
//! // Parse ethanol from SMILES
//! let ethanol = parse_smiles("CCO").unwrap();
//! assert_eq!(ethanol.atom_count(), 3);
//!
//! // Hydrogens become graph nodes
//! let full = add_explicit_hydrogens(&ethanol);
//! assert_eq!(full.atom_count(), 9);
//!
//! // Generate fingerprint and compare
//! let fp1 = morgan_fingerprint(&full, 2, 2048);
//! let fp2 = morgan_fingerprint(&full, 2, 2048);
//! assert!((tanimoto_similarity(&fp1, &fp2) - 1.0).abs() < 1e-10);
//! ```

pub mod aromaticity;
pub mod element;
pub mod fingerprint;
pub mod hydrogens;
pub mod maccs;
pub mod mhfp;
pub mod molecule;
pub mod smiles;

mod ring;

pub use aromaticity::{kekulize, perceive_aromaticity};
pub use element::{default_valences, element_by_number, element_by_symbol, Element};
pub use fingerprint::{
    morgan_counts, morgan_environments, morgan_fingerprint, tanimoto_bulk, tanimoto_similarity,
    Fingerprint,
};
pub use hydrogens::{add_explicit_hydrogens, remove_explicit_hydrogens};
pub use maccs::{maccs_fingerprint, MACCS_WIDTH};
pub use mhfp::{jaccard, secfp, shingle_hashes, shingling, MhfpEncoder};
pub use molecule::{Bond, BondOrder, BondStereo, Chirality, MolAtom, Molecule};
pub use smiles::{parse_smiles, parse_smiles_named};
