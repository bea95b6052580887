//! Tabular import source: a header row followed by data rows of strings.

use crate::CoreError;

/// Rows before this offset are headers and never become records.
pub const DEFAULT_HEADER_ROWS: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    rows: Vec<Vec<String>>,
    header_rows: usize,
}

impl ImportTable {
    /// Wrap raw rows whose first row is a header.
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self::with_header_rows(rows, DEFAULT_HEADER_ROWS)
    }

    #[must_use]
    pub fn with_header_rows(rows: Vec<Vec<String>>, header_rows: usize) -> Self {
        Self { rows, header_rows }
    }

    /// Parse a JSON array of string arrays, e.g. a sheet exported as
    /// `[["Company", ...], ["Acme", ...]]`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTable`] if the text is not an array of
    /// string arrays.
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        let rows: Vec<Vec<String>> =
            serde_json::from_str(raw).map_err(|e| CoreError::InvalidTable(e.to_string()))?;
        Ok(Self::new(rows))
    }

    /// Parse tab-separated text, one row per line. Blank lines are ignored.
    #[must_use]
    pub fn from_tsv_str(raw: &str) -> Self {
        let rows = raw
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();
        Self::new(rows)
    }

    #[must_use]
    pub fn header(&self) -> Option<&[String]> {
        if self.header_rows == 0 {
            return None;
        }
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows paired with their 1-based position among data rows.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows
            .iter()
            .skip(self.header_rows)
            .enumerate()
            .map(|(i, row)| (i + 1, row.as_slice()))
    }

    #[must_use]
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(self.header_rows)
    }
}
