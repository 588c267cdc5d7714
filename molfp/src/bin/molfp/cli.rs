use std::path::PathBuf;

use clap::Parser;
use molfp::{EncoderKind, FingerprintConfig, Result};

#[derive(Parser)]
#[command(name = "molfp", version, about = "Convert SMILES strings into fingerprint tables")]
pub(crate) struct Cli {
    /// The fingerprint to compute. Defaults to the config file's `encoder`,
    /// then to ecfp.
    #[arg(value_enum)]
    pub(crate) encoder: Option<EncoderKind>,

    /// The CSV file to read SMILES from.
    #[arg(short, long)]
    pub(crate) input: PathBuf,

    /// The input column holding the SMILES strings. Defaults to `smiles`.
    #[arg(short, long)]
    pub(crate) column: Option<String>,

    /// Treat the input as plain text with one SMILES per line instead of CSV.
    #[arg(long)]
    pub(crate) lines: bool,

    /// Where to write the fingerprint table. If absent, print it to stdout.
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Environment radius.
    #[arg(short, long)]
    pub(crate) radius: Option<usize>,

    /// Output width (number of permutations for SECFP).
    #[arg(short, long)]
    pub(crate) width: Option<usize>,

    /// SECFP folding length.
    #[arg(short, long)]
    pub(crate) length: Option<usize>,

    /// Count environments instead of flagging their presence (ECFP only).
    #[arg(long)]
    pub(crate) counts: bool,

    /// The number of threads to use. Defaults to the number of logical CPUs as
    /// detected by rayon.
    #[arg(short, long)]
    pub(crate) threads: Option<usize>,

    /// A TOML file of settings. Flags given on the command line take
    /// precedence.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

impl Cli {
    /// The file configuration (or the defaults) with command-line overrides
    /// applied.
    pub(crate) fn resolve(&self) -> Result<FingerprintConfig> {
        let mut config = match &self.config {
            Some(path) => FingerprintConfig::load(path)?,
            None => FingerprintConfig::default(),
        };
        if let Some(encoder) = self.encoder {
            config.encoder = encoder;
        }
        if let Some(column) = &self.column {
            config.column = column.clone();
        }
        if self.radius.is_some() {
            config.radius = self.radius;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(length) = self.length {
            config.length = length;
        }
        if self.counts {
            config.use_counts = Some(true);
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "molfp", "ecfp", "-i", "in.csv", "-w", "1024", "--counts", "-c", "smi",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.encoder, EncoderKind::Ecfp);
        assert_eq!(config.width, 1024);
        assert_eq!(config.use_counts, Some(true));
        assert_eq!(config.column, "smi");
        assert!(cli.output.is_none());
    }

    #[test]
    fn encoder_falls_back_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("molfp.toml");
        std::fs::write(&path, "encoder = \"maccs\"\n").unwrap();
        let path = path.to_str().unwrap();

        let from_file = Cli::parse_from(["molfp", "-i", "in.csv", "--config", path]);
        assert_eq!(from_file.resolve().unwrap().encoder, EncoderKind::Maccs);

        let overridden = Cli::parse_from(["molfp", "secfp", "-i", "in.csv", "--config", path]);
        assert_eq!(overridden.resolve().unwrap().encoder, EncoderKind::Secfp);

        let bare = Cli::parse_from(["molfp", "-i", "in.csv"]);
        assert_eq!(bare.resolve().unwrap().encoder, EncoderKind::Ecfp);
    }

    #[test]
    fn zero_width_is_rejected() {
        let cli = Cli::parse_from(["molfp", "secfp", "-i", "in.csv", "--width", "0"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn unknown_encoder_is_a_usage_error() {
        assert!(Cli::try_parse_from(["molfp", "atompair", "-i", "in.csv"]).is_err());
    }
}
