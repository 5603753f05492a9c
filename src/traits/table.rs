//! In-memory metadata tables, e.g. sampling location or lineage per sequence.

use crate::error::PhyloError;
use log::debug;
use std::io::Read;
use std::path::Path;

// =#========================================================================#=
// METADATA TABLE
// =#========================================================================#=
/// A table of string values with named columns.
///
/// # Example
/// ```
/// use phylokit::traits::MetadataTable;
///
/// let csv = "strain,country\nA_2020-01-01,Laos\nB_2020-02-01,Vietnam\n";
/// let table = MetadataTable::from_reader(csv.as_bytes(), b',').unwrap();
/// assert_eq!(table.lookup("strain", "B_2020-02-01", "country").unwrap(), vec!["Vietnam"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MetadataTable {
    /// Creates an empty table with the given column names.
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Reads a delimited file with header line, e.g. CSV (`b','`) or TSV (`b'\t'`).
    pub fn from_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, PhyloError> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_path(path.as_ref())?;
        let table = Self::from_csv(rdr)?;
        debug!("Read {} rows from {}", table.len(), path.as_ref().display());
        Ok(table)
    }

    /// Reads delimited text with header line from any reader.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, PhyloError> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_reader(reader);
        Self::from_csv(rdr)
    }

    fn from_csv<R: Read>(mut rdr: csv::Reader<R>) -> Result<Self, PhyloError> {
        let mut table = Self::new(rdr.headers()?.iter());
        for result in rdr.records() {
            let record = result?;
            table.push_row(record.iter());
        }
        Ok(table)
    }

    /// Appends a row; missing trailing cells are filled with empty strings.
    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() < self.headers.len() {
            row.resize(self.headers.len(), String::new());
        }
        self.rows.push(row);
    }

    /// Returns the column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of column `name`.
    ///
    /// # Errors
    /// [PhyloError::MissingColumn] if there is no such column.
    pub fn column_index(&self, name: &str) -> Result<usize, PhyloError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PhyloError::MissingColumn(name.to_string()))
    }

    /// Returns the values in `value_column` of all rows whose `key_column` equals `key`.
    pub fn lookup(&self, key_column: &str, key: &str, value_column: &str) -> Result<Vec<&str>, PhyloError> {
        let key_index = self.column_index(key_column)?;
        let value_index = self.column_index(value_column)?;
        Ok(self
            .rows
            .iter()
            .filter(|row| row[key_index] == key)
            .map(|row| row[value_index].as_str())
            .collect())
    }
}
