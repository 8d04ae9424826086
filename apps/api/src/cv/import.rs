//! CSV import for repeatable sections.
//!
//! The header row names entry fields using their wire names (`institution`,
//! `startDate`, ...). Unknown columns are ignored, missing cells become empty
//! strings, and blank lines are skipped.

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::cv::models::{Entry, FieldName};
use crate::errors::AppError;

pub fn parse_entries<T: Entry>(csv_text: &str) -> Result<Vec<T>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let columns: Vec<Option<T::Field>> = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("Invalid CSV header: {e}")))?
        .iter()
        .map(<T::Field as FieldName>::from_name)
        .collect();

    if columns.iter().all(Option::is_none) {
        debug!(
            section = T::SECTION.as_str(),
            "CSV header names no known fields; nothing imported"
        );
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Validation(format!("Invalid CSV row: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let mut entry = T::blank();
        for (cell, column) in record.iter().zip(&columns) {
            if let Some(field) = column {
                entry.set(*field, cell);
            }
        }
        entries.push(entry);
    }

    Ok(entries)
}
