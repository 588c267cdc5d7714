//! Diagnostic reporting of SMILES that failed to parse.

use log::warn;

/// Receiver of the one-per-run report of erroneous SMILES.
pub trait Diagnostics {
    /// Called once per encoder run, only when at least one input failed.
    fn report_erroneous(&self, smiles: &[String]);
}

/// Writes the report through the `log` facade at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report_erroneous(&self, smiles: &[String]) {
        warn!("{}", format_report(smiles));
    }
}

/// Prints the report to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn report_erroneous(&self, smiles: &[String]) {
        eprintln!("{}", format_report(smiles));
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn report_erroneous(&self, smiles: &[String]) {
        (**self).report_erroneous(smiles)
    }
}

/// Human-readable listing of the erroneous SMILES, one per line.
pub fn format_report(smiles: &[String]) -> String {
    format!(
        "The following erroneous SMILES have been found in the data:\n{}.\n\
         The erroneous SMILES will be removed from the data.",
        smiles.join("\n")
    )
}
