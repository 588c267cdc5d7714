//! Run configuration, loadable from TOML.

use std::fs::read_to_string;
use std::path::Path;

use clap::ValueEnum;
use molfp_core::{MolfpError, Result};
use serde::Deserialize;

use crate::generator::{EcfcParams, EcfpParams, SecfpParams};

/// Which encoder to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    /// Morgan bit vector
    #[default]
    Ecfp,
    /// Morgan count vector
    Ecfc,
    /// 167-position MACCS keys
    Maccs,
    /// MinHashed SECFP
    Secfp,
}

impl EncoderKind {
    pub fn name(&self) -> &'static str {
        match self {
            EncoderKind::Ecfp => "ecfp",
            EncoderKind::Ecfc => "ecfc",
            EncoderKind::Maccs => "maccs",
            EncoderKind::Secfp => "secfp",
        }
    }
}

/// Settings for a fingerprinting run. Every field has a default, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FingerprintConfig {
    pub encoder: EncoderKind,

    /// Environment radius. Defaults to 2 for ECFP/ECFC and 3 for SECFP.
    pub radius: Option<usize>,

    /// Output width; the permutation count for SECFP. Ignored by MACCS.
    pub width: usize,

    /// SECFP folding length.
    pub length: usize,

    /// Count instead of presence. Defaults to true for ECFC, false for ECFP.
    pub use_counts: Option<bool>,

    /// The CSV column holding the SMILES strings.
    pub column: String,

    /// The number of threads to use. 0 means the number of logical CPUs as
    /// detected by rayon.
    pub threads: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderKind::Ecfp,
            radius: None,
            width: 2048,
            length: 2048,
            use_counts: None,
            column: "smiles".to_owned(),
            threads: 0,
        }
    }
}

impl FingerprintConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| MolfpError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| MolfpError::Config(e.to_string()))
    }

    pub fn ecfp_params(&self) -> EcfpParams {
        EcfpParams {
            radius: self.radius.unwrap_or(2),
            width: self.width,
            use_counts: self.use_counts.unwrap_or(false),
        }
    }

    pub fn ecfc_params(&self) -> EcfcParams {
        EcfcParams {
            radius: self.radius.unwrap_or(2),
            width: self.width,
            use_counts: self.use_counts.unwrap_or(true),
        }
    }

    pub fn secfp_params(&self) -> SecfpParams {
        SecfpParams { radius: self.radius.unwrap_or(3), width: self.width, length: self.length }
    }

    /// Width of the table the configured encoder produces.
    pub fn output_width(&self) -> usize {
        match self.encoder {
            EncoderKind::Maccs => crate::generator::MACCS_WIDTH,
            _ => self.width,
        }
    }

    /// Check the parameters the configured encoder will use.
    pub fn validate(&self) -> Result<()> {
        if self.column.is_empty() {
            return Err(MolfpError::InvalidInput("column name is empty".into()));
        }
        match self.encoder {
            EncoderKind::Ecfp => self.ecfp_params().validate(),
            EncoderKind::Ecfc => EcfpParams::from(self.ecfc_params()).validate(),
            EncoderKind::Maccs => Ok(()),
            EncoderKind::Secfp => self.secfp_params().validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FingerprintConfig::from_toml_str("").unwrap();
        assert_eq!(config, FingerprintConfig::default());
        assert_eq!(config.ecfp_params(), EcfpParams::default());
        assert_eq!(config.secfp_params(), SecfpParams::default());
    }

    #[test]
    fn encoder_specific_defaults() {
        let ecfc = FingerprintConfig { encoder: EncoderKind::Ecfc, ..Default::default() };
        assert_eq!(ecfc.ecfc_params(), EcfcParams::default());
        assert!(!ecfc.ecfp_params().use_counts);

        let secfp = FingerprintConfig::from_toml_str("encoder = \"secfp\"\nwidth = 512").unwrap();
        assert_eq!(secfp.secfp_params(), SecfpParams { radius: 3, width: 512, length: 2048 });
        assert_eq!(secfp.output_width(), 512);

        let maccs = FingerprintConfig { encoder: EncoderKind::Maccs, width: 7, ..Default::default() };
        assert_eq!(maccs.output_width(), 167);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let text = r#"
            encoder = "ecfc"
            radius = 3
            width = 1024
            use_counts = false
            column = "canonical_smiles"
            threads = 4
        "#;
        let config = FingerprintConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config.ecfc_params(),
            EcfcParams { radius: 3, width: 1024, use_counts: false }
        );
        assert_eq!(config.column, "canonical_smiles");
        assert_eq!(config.threads, 4);
    }

    #[test]
    fn unknown_keys_and_encoders_are_rejected() {
        let err = FingerprintConfig::from_toml_str("widht = 10").unwrap_err();
        assert!(matches!(err, MolfpError::Config(_)));
        assert!(FingerprintConfig::from_toml_str("encoder = \"atompair\"").is_err());
    }

    #[test]
    fn validation() {
        assert!(FingerprintConfig::default().validate().is_ok());
        let zero = FingerprintConfig { width: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(MolfpError::InvalidInput(_))));
        let maccs = FingerprintConfig { encoder: EncoderKind::Maccs, ..zero.clone() };
        assert!(maccs.validate().is_ok());
        let secfp = FingerprintConfig { encoder: EncoderKind::Secfp, length: 0, ..Default::default() };
        assert!(secfp.validate().is_err());
        let column = FingerprintConfig { column: String::new(), ..Default::default() };
        assert!(column.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FingerprintConfig::load("/nonexistent/molfp.toml").unwrap_err();
        assert!(matches!(err, MolfpError::Io(_)));
    }
}
