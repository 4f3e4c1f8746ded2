//! Reference dataset adapter: semicolon-delimited file loader.
//!
//! Reads files shaped like `bank-additional-full.csv`:
//!
//! ```text
//! "age";"job";"marital";...
//! 56;"housemaid";"married";...
//! ```
//!
//! The file is read once at startup and shared read-only afterwards.

use std::path::Path;

use crate::domain::{ReferenceData, ReferenceError};

pub const DELIMITER: char = ';';

/// Error type for reference dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read reference dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Reference dataset is empty")]
    Empty,

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Parsed delimited file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows whose field count did not match the header
    pub rows_skipped: usize,
}

/// Split one line on `delimiter`, honouring double quotes.
///
/// Quotes are removed; a doubled quote inside a quoted field is a literal quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Parse delimited text into a header and rows.
///
/// # Errors
/// Returns `DatasetError::Empty` when there is no header line.
pub fn parse_table(raw: &str, delimiter: char) -> Result<Table, DatasetError> {
    let mut lines = raw
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let header = match lines.next() {
        Some(line) => split_fields(line.trim_start_matches('\u{feff}'), delimiter),
        None => return Err(DatasetError::Empty),
    };

    let mut rows = Vec::new();
    let mut rows_skipped = 0usize;
    for (line_no, line) in lines.enumerate() {
        let fields = split_fields(line, delimiter);
        if fields.len() != header.len() {
            tracing::debug!(
                "Skipping dataset row {}: {} fields, expected {}",
                line_no + 2,
                fields.len(),
                header.len()
            );
            rows_skipped += 1;
            continue;
        }
        rows.push(fields);
    }

    Ok(Table {
        header,
        rows,
        rows_skipped,
    })
}

/// Build reference statistics from delimited text.
///
/// # Errors
/// Returns error if the text has no header or the statistics cannot be built.
pub fn reference_from_str(raw: &str) -> Result<ReferenceData, DatasetError> {
    let table = parse_table(raw, DELIMITER)?;
    if table.rows_skipped > 0 {
        tracing::warn!(
            "Skipped {} malformed reference dataset rows",
            table.rows_skipped
        );
    }
    Ok(ReferenceData::from_rows(&table.header, &table.rows)?)
}

/// Load the reference dataset from disk.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_reference_data(path: &Path) -> Result<ReferenceData, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let data = reference_from_str(&raw)?;

    let t = data.thresholds();
    tracing::info!(
        "Loaded reference dataset from {:?} ({} rows, {} null cells dropped; caps: age={}, campaign={}, previous={})",
        path,
        data.row_count(),
        data.dropped_cells(),
        t.age_cap,
        t.campaign_cap,
        t.previous_cap
    );

    Ok(data)
}
