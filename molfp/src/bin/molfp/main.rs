use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use log::info;
use molfp::{
    load_smiles_csv, load_smiles_lines, FingerprintGenerator, GraphEngine, Result,
    StderrDiagnostics,
};

use crate::cli::Cli;

mod cli;

fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve()?;

    #[cfg(feature = "parallel")]
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build_global()
        .map_err(|e| molfp::MolfpError::Other(e.to_string()))?;

    let smiles = if cli.lines {
        load_smiles_lines(&cli.input)?
    } else {
        load_smiles_csv(&cli.input, &config.column)?
    };

    info!("encoding {} smiles with {}", smiles.len(), config.encoder.name());
    let generator = FingerprintGenerator::with_parts(GraphEngine, StderrDiagnostics);
    let table = generator.encode(&smiles, &config);

    match &cli.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            table.write_csv(&mut out)?;
            out.flush()?;
            info!("wrote {} rows to {}", table.len(), path.display());
        }
        None => table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("molfp: {e}");
            ExitCode::FAILURE
        }
    }
}
