//! Reading SMILES inputs from CSV and plain-text files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use log::info;
use molfp_core::{MolfpError, Result};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        MolfpError::Io(std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))
    })
}

/// Values of `column` from a headed CSV file, in file order.
pub fn load_smiles_csv(path: impl AsRef<Path>, column: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let smiles = read_smiles_csv(open(path)?, column)?;
    info!("{} smiles loaded from {}", smiles.len(), path.display());
    Ok(smiles)
}

/// Values of `column` from headed CSV data, in order.
///
/// Fails with `InvalidInput` if the header has no such column.
pub fn read_smiles_csv<R: Read>(reader: R, column: &str) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers().map_err(|e| MolfpError::Csv(e.to_string()))?;
    let index = headers.iter().position(|h| h == column).ok_or_else(|| {
        MolfpError::InvalidInput(format!("no column named {column:?} in CSV header"))
    })?;

    let mut smiles = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| MolfpError::Csv(e.to_string()))?;
        smiles.push(record.get(index).unwrap_or_default().to_owned());
    }
    Ok(smiles)
}

/// One SMILES per line; blank lines are skipped and surrounding whitespace
/// trimmed.
pub fn load_smiles_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut smiles = Vec::new();
    for line in BufReader::new(open(path)?).lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            smiles.push(line.to_owned());
        }
    }
    info!("{} smiles loaded from {}", smiles.len(), path.display());
    Ok(smiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_column_in_order() {
        let data = "id,smiles,activity\n1,CCCC,0.5\n2,CO,1.0\n3,XXXX,2.0\n";
        let smiles = read_smiles_csv(data.as_bytes(), "smiles").unwrap();
        assert_eq!(smiles, vec!["CCCC", "CO", "XXXX"]);
    }

    #[test]
    fn quoted_fields() {
        let data = "smiles,name\n\"CC(=O)O\",\"acetic acid, glacial\"\n";
        let smiles = read_smiles_csv(data.as_bytes(), "smiles").unwrap();
        assert_eq!(smiles, vec!["CC(=O)O"]);
    }

    #[test]
    fn missing_column_is_invalid_input() {
        let data = "id,structure\n1,CCO\n";
        let err = read_smiles_csv(data.as_bytes(), "smiles").unwrap_err();
        assert!(matches!(err, MolfpError::InvalidInput(_)));
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let data = "id,smiles\n1,CCO\n2\n";
        let err = read_smiles_csv(data.as_bytes(), "smiles").unwrap_err();
        assert!(matches!(err, MolfpError::Csv(_)));
    }

    #[test]
    fn header_only_gives_nothing() {
        assert!(read_smiles_csv("smiles\n".as_bytes(), "smiles").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_smiles_csv("/nonexistent/input.csv", "smiles").unwrap_err();
        assert!(matches!(err, MolfpError::Io(_)));
    }
}
