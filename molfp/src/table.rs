//! Fingerprint tables keyed by the input SMILES string.

use std::io::Write;

use molfp_core::{MolfpError, Result, Summarizable};

/// One row of a [`FingerprintTable`]: the input string and its cells.
///
/// A `None` cell is a null; placeholder rows for unparsable input are all null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub smiles: String,
    pub cells: Vec<Option<u32>>,
}

impl Row {
    /// Whether the row has no null cells.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The cell values, if the row is complete.
    pub fn values(&self) -> Option<Vec<u32>> {
        self.cells.iter().copied().collect()
    }
}

/// Ordered rows of fixed-width fingerprint vectors.
///
/// Rows keep insertion order and row keys need not be unique: the same
/// SMILES given twice yields two rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintTable {
    width: usize,
    rows: Vec<Row>,
}

impl FingerprintTable {
    /// An empty table whose rows will all have `width` cells.
    pub fn new(width: usize) -> Self {
        FingerprintTable { width, rows: Vec::new() }
    }

    /// Append a row. Fails if `cells` does not have exactly `width` entries.
    pub fn push(&mut self, smiles: impl Into<String>, cells: Vec<Option<u32>>) -> Result<()> {
        let smiles = smiles.into();
        if cells.len() != self.width {
            return Err(MolfpError::InvalidInput(format!(
                "row for {smiles:?} has {} cells, table width is {}",
                cells.len(),
                self.width
            )));
        }
        self.rows.push(Row { smiles, cells });
        Ok(())
    }

    /// Append a complete row of values.
    pub fn push_values(&mut self, smiles: impl Into<String>, values: Vec<u32>) -> Result<()> {
        self.push(smiles, values.into_iter().map(Some).collect())
    }

    /// Append an all-null placeholder row.
    pub fn push_placeholder(&mut self, smiles: impl Into<String>) {
        self.rows.push(Row { smiles: smiles.into(), cells: vec![None; self.width] });
    }

    /// Number of cells in every row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Row keys in order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|r| r.smiles.as_str())
    }

    /// First row with the given key.
    pub fn get(&self, smiles: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.smiles == smiles)
    }

    /// Every row with the given key, in order.
    pub fn get_all<'a>(&'a self, smiles: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows.iter().filter(move |r| r.smiles == smiles)
    }

    /// Remove every row containing a null cell; returns how many were removed.
    pub fn drop_incomplete(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(Row::is_complete);
        before - self.rows.len()
    }

    /// Dense row-major matrix of all cells.
    ///
    /// Fails if any cell is null.
    pub fn to_matrix(&self) -> Result<Vec<u32>> {
        let mut matrix = Vec::with_capacity(self.rows.len() * self.width);
        for row in &self.rows {
            for cell in &row.cells {
                let value = cell.ok_or_else(|| {
                    MolfpError::InvalidInput(format!("row for {:?} contains nulls", row.smiles))
                })?;
                matrix.push(value);
            }
        }
        Ok(matrix)
    }

    /// Write the table as CSV with header `smiles,0,1,...,width-1`.
    ///
    /// Null cells are written as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let csv_err = |e: csv::Error| MolfpError::Csv(e.to_string());

        let mut header = Vec::with_capacity(self.width + 1);
        header.push("smiles".to_string());
        header.extend((0..self.width).map(|i| i.to_string()));
        wtr.write_record(&header).map_err(csv_err)?;

        let mut record = Vec::with_capacity(self.width + 1);
        for row in &self.rows {
            record.clear();
            record.push(row.smiles.clone());
            record.extend(row.cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
            wtr.write_record(&record).map_err(csv_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FingerprintTable {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Summarizable for FingerprintTable {
    fn summary(&self) -> String {
        let incomplete = self.rows.iter().filter(|r| !r.is_complete()).count();
        format!(
            "FingerprintTable: {} rows x {} columns ({} incomplete)",
            self.rows.len(),
            self.width,
            incomplete
        )
    }
}
