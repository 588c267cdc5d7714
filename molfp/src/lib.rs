//! Convert SMILES strings into fixed-width fingerprint tables.
//!
//! Four encoders are available on [`FingerprintGenerator`]:
//!
//! - **ECFP**: Morgan bit vector ([`encode_ecfp`](FingerprintGenerator::encode_ecfp))
//! - **ECFC**: Morgan count vector ([`encode_ecfc`](FingerprintGenerator::encode_ecfc))
//! - **MACCS**: 167-position structural keys ([`encode_maccs`](FingerprintGenerator::encode_maccs))
//! - **SECFP**: MinHash of SMILES extended connectivity shingles
//!   ([`encode_secfp`](FingerprintGenerator::encode_secfp))
//!
//! Inputs that fail to parse are listed in a single diagnostic report and left
//! out of the returned table; every other input keeps its position and is the
//! key of its row.
//!
//! # Example
//!
//! ```
//! use molfp::FingerprintGenerator;
//!
//! let table = FingerprintGenerator::new().encode_maccs(["CCCC", "CO", "XXXX"]);
//! assert_eq!(table.len(), 2);
//! assert!(table.iter().all(|row| row.cells.len() == 167));
//! ```

pub mod config;
pub mod engine;
pub mod generator;
pub mod loader;
pub mod report;
pub mod table;

pub use config::{EncoderKind, FingerprintConfig};
pub use engine::{ChemEngine, GraphEngine};
pub use generator::{EcfcParams, EcfpParams, FingerprintGenerator, SecfpParams, MACCS_WIDTH};
pub use loader::{load_smiles_csv, load_smiles_lines, read_smiles_csv};
pub use report::{format_report, Diagnostics, LogDiagnostics, StderrDiagnostics};
pub use table::{FingerprintTable, Row};

pub use molfp_core::{MolfpError, Result};
