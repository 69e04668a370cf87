//! Comma-delimited text reader.
//!
//! The first non-blank line is the header. Fields may be wrapped in double
//! quotes so that they can contain commas; a doubled quote inside a quoted
//! field is a literal quote. Rows shorter than the header simply lack the
//! trailing columns.

use std::io::{BufRead, BufReader, Read};
use tracing::debug;

use crate::error::LoadError;
use crate::store::RawRow;

/// Split one line into trimmed fields, honoring double quotes.
pub fn split_fields(line: &str) -> Vec<String> {
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
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Read every data row as a `column → value` map.
pub fn parse_delimited<R: Read>(reader: R) -> Result<Vec<RawRow>, LoadError> {
    let mut reader = BufReader::new(reader);
    let mut buffer = String::new();
    let mut line_number = 0;
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    loop {
        buffer.clear();
        if reader.read_line(&mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let line = buffer.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line);
        let Some(columns) = &header else {
            header = Some(fields);
            continue;
        };

        if fields.len() > columns.len() {
            debug!(
                "Line {}: {} fields for {} columns; extra fields ignored",
                line_number,
                fields.len(),
                columns.len()
            );
        }
        rows.push(columns.iter().cloned().zip(fields).collect());
    }

    if header.is_none() {
        return Err(LoadError::InvalidFormat {
            line: line_number,
            message: "no header row".to_string(),
        });
    }
    Ok(rows)
}
