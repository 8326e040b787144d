//! Delimited text surface
//!
//! [`write_csv`] serializes the result table with a fixed header row;
//! [`parse_csv`] round-trips that output back into logical rows.
//! [`parse_table`] loads arbitrary delimited input files into a [`RawTable`]
//! for the CLI. Quoting follows the usual CSV convention: fields containing
//! a comma, quote or line break are wrapped in double quotes and embedded
//! quotes are doubled.
//!
//! No example in our dependency neighbourhood warranted a CSV crate for
//! eight fixed columns, so the writer and parser are local.

use std::mem;

use partx_core::RawTable;

use crate::assemble::MatchRow;
use crate::error::{PipelineError, Result};

/// Result table column order
pub const RESULT_HEADER: [&str; 8] = [
    "Left_PartNumber",
    "Left_Description",
    "Right_PartNumber",
    "Right_Description",
    "Similarity",
    "SharedKeywordCount",
    "SharedKeywords",
    "AuxValue",
];

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_record(out: &mut String, fields: &[&str]) {
    let line = fields.iter().map(|f| escape(f)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Serialize result rows as UTF-8 CSV with a header row.
///
/// Scores render with exactly 3 decimals; a null auxiliary value renders as
/// an empty field.
#[must_use]
pub fn write_csv(rows: &[MatchRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, &RESULT_HEADER);

    for row in rows {
        let similarity = format!("{:.3}", row.similarity);
        let count = row.shared_keyword_count.to_string();
        push_record(
            &mut out,
            &[
                &row.left_part_number,
                &row.left_description,
                &row.right_part_number,
                &row.right_description,
                &similarity,
                &count,
                &row.shared_keywords,
                row.aux_value.as_deref().unwrap_or(""),
            ],
        );
    }

    out
}

/// Split delimited input into records, honoring quoted fields
fn parse_rows(input: &str) -> Result<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => record.push(mem::take(&mut field)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                // Blank lines carry no record
                if !field.is_empty() || !record.is_empty() {
                    record.push(mem::take(&mut field));
                    rows.push(mem::take(&mut record));
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(PipelineError::Csv("unterminated quoted field".to_string()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        rows.push(record);
    }

    Ok(rows)
}

/// Parse an arbitrary delimited input file into a raw table
pub fn parse_table(input: &str) -> Result<RawTable> {
    Ok(RawTable::new(parse_rows(input)?))
}

/// Parse [`write_csv`] output back into logical result rows
pub fn parse_csv(input: &str) -> Result<Vec<MatchRow>> {
    let mut rows = parse_rows(input)?.into_iter();

    let header = rows
        .next()
        .ok_or_else(|| PipelineError::Csv("missing header row".to_string()))?;
    if header != RESULT_HEADER {
        return Err(PipelineError::Csv(format!(
            "unexpected header: {header:?}"
        )));
    }

    rows.enumerate()
        .map(|(i, fields)| {
            if fields.len() != RESULT_HEADER.len() {
                return Err(PipelineError::Csv(format!(
                    "row {} has {} fields, expected {}",
                    i + 1,
                    fields.len(),
                    RESULT_HEADER.len()
                )));
            }
            let mut fields = fields.into_iter();
            // Field order matches RESULT_HEADER
            let left_part_number = fields.next().unwrap_or_default();
            let left_description = fields.next().unwrap_or_default();
            let right_part_number = fields.next().unwrap_or_default();
            let right_description = fields.next().unwrap_or_default();
            let similarity_raw = fields.next().unwrap_or_default();
            let count_raw = fields.next().unwrap_or_default();
            let shared_keywords = fields.next().unwrap_or_default();
            let aux_raw = fields.next().unwrap_or_default();

            let similarity: f32 = similarity_raw.parse().map_err(|_| {
                PipelineError::Csv(format!("row {}: bad similarity {similarity_raw:?}", i + 1))
            })?;
            let shared_keyword_count: usize = count_raw.parse().map_err(|_| {
                PipelineError::Csv(format!("row {}: bad keyword count {count_raw:?}", i + 1))
            })?;

            Ok(MatchRow {
                left_part_number,
                left_description,
                right_part_number,
                right_description,
                similarity,
                shared_keyword_count,
                shared_keywords,
                aux_value: if aux_raw.is_empty() { None } else { Some(aux_raw) },
            })
        })
        .collect()
}
