//! Tabular input model and record normalization
//!
//! Raw catalogue files arrive as ragged grids of string cells, sometimes with
//! the real header buried a few rows down. [`TableRules`] names the header row,
//! the first data row, and the two columns that matter per source, and
//! [`normalize`] turns the grid into canonical [`Record`]s.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A raw tabular input: one `Vec<String>` per source row, empty cell = `""`.
///
/// Header placement is not assumed; [`TableRules`] decides which row names
/// the columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Per-source normalization rule: where the header lives, where data starts,
/// and which columns play the part-identifier and description roles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRules {
    /// Index of the row that supplies column names
    #[serde(default)]
    pub header_row: usize,

    /// Index of the first data row
    #[serde(default = "default_data_start_row")]
    pub data_start_row: usize,

    /// Source column holding the part identifier
    pub id_column: String,

    /// Source column holding the free-text description
    pub desc_column: String,
}

fn default_data_start_row() -> usize {
    1
}

impl TableRules {
    /// Plain rules: header in row 0, data from row 1
    pub fn new(id_column: impl Into<String>, desc_column: impl Into<String>) -> Self {
        Self {
            header_row: 0,
            data_start_row: 1,
            id_column: id_column.into(),
            desc_column: desc_column.into(),
        }
    }

    /// Rules for sheets with leading junk rows before the real header
    pub fn with_offsets(mut self, header_row: usize, data_start_row: usize) -> Self {
        self.header_row = header_row;
        self.data_start_row = data_start_row;
        self
    }
}

/// A canonical part record: identifier plus free-text description.
///
/// Part numbers are not required to be unique within or across sets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub part_number: String,
    pub description: String,
}

impl Record {
    pub fn new(part_number: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            description: description.into(),
        }
    }
}

/// Locate a named column in a header row
fn column_index(header: &[String], column: &str, table: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell.trim() == column)
        .ok_or_else(|| Error::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
}

fn header_row<'a>(table: &'a RawTable, rules: &TableRules, label: &str) -> Result<&'a [String]> {
    table
        .rows
        .get(rules.header_row)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::MissingColumn {
            table: label.to_string(),
            column: rules.id_column.clone(),
        })
}

/// Normalize a raw table into canonical records.
///
/// Selects the two designated columns, drops every row where either field is
/// empty, and keeps the remaining rows in source order. Pure transform; fails
/// only when a designated column is absent from the header.
pub fn normalize(table: &RawTable, rules: &TableRules, label: &str) -> Result<Vec<Record>> {
    let header = header_row(table, rules, label)?;
    let id_idx = column_index(header, &rules.id_column, label)?;
    let desc_idx = column_index(header, &rules.desc_column, label)?;

    let records = table
        .rows
        .iter()
        .skip(rules.data_start_row)
        .filter_map(|row| {
            let id = row.get(id_idx).map(|s| s.trim()).unwrap_or("");
            let desc = row.get(desc_idx).map(|s| s.trim()).unwrap_or("");
            if id.is_empty() || desc.is_empty() {
                None
            } else {
                Some(Record::new(id, desc))
            }
        })
        .collect();

    Ok(records)
}

/// Build the auxiliary key→value mapping (e.g. part number → bin location)
/// from a raw table, dropping pairs where either cell is empty.
///
/// Duplicate keys keep their first value so lookups stay deterministic.
pub fn build_aux_map(
    table: &RawTable,
    rules: &TableRules,
    key_column: &str,
    value_column: &str,
    label: &str,
) -> Result<AHashMap<String, String>> {
    let header = header_row(table, rules, label)?;
    let key_idx = column_index(header, key_column, label)?;
    let value_idx = column_index(header, value_column, label)?;

    let mut map = AHashMap::new();
    for row in table.rows.iter().skip(rules.data_start_row) {
        let key = row.get(key_idx).map(|s| s.trim()).unwrap_or("");
        let value = row.get(value_idx).map(|s| s.trim()).unwrap_or("");
        if key.is_empty() || value.is_empty() {
            continue;
        }
        map.entry(key.to_string()).or_insert_with(|| value.to_string());
    }

    Ok(map)
}
