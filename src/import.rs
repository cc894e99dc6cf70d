//! Task rows from tabular exports.
//!
//! Headers are matched after trimming and lowercasing. The identifier column
//! may be called `task number` or `task`; the effort column
//! `estimation of hours per task`, `h of hours per task` or `hours`.

use crate::task::TaskRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

pub const TASK_COLUMN: &str = "task number";
pub const HOURS_COLUMN: &str = "estimation of hours per task";

const TASK_ALIASES: [&str; 2] = [TASK_COLUMN, "task"];
const HOURS_ALIASES: [&str; 3] = [HOURS_COLUMN, "h of hours per task", "hours"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub type ImportResult<T> = Result<T, ImportError>;

pub fn load_task_rows_from_csv<P: AsRef<Path>>(path: P) -> ImportResult<Vec<TaskRow>> {
    let file = File::open(path)?;
    read_task_rows(file)
}

/// Read rows in file order. Rows whose identifier is empty or "nan" are
/// dropped; unreadable effort cells become `None`.
pub fn read_task_rows<R: Read>(reader: R) -> ImportResult<Vec<TaskRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let task_idx = find_column(&headers, &TASK_ALIASES);
    let hours_idx = find_column(&headers, &HOURS_ALIASES);
    let (task_idx, hours_idx) = match (task_idx, hours_idx) {
        (Some(t), Some(h)) => (t, h),
        (t, h) => {
            let mut missing = Vec::new();
            if t.is_none() {
                missing.push(TASK_COLUMN.to_string());
            }
            if h.is_none() {
                missing.push(HOURS_COLUMN.to_string());
            }
            return Err(ImportError::MissingColumns(missing));
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = TaskRow::new(
            record.get(task_idx).unwrap_or("").trim(),
            parse_effort(record.get(hours_idx).unwrap_or("")),
        );
        if row.is_blank() {
            continue;
        }
        rows.push(row);
    }
    tracing::debug!(rows = rows.len(), "imported task rows");
    Ok(rows)
}

pub fn read_task_rows_from_str(input: &str) -> ImportResult<Vec<TaskRow>> {
    read_task_rows(input.as_bytes())
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

fn parse_effort(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_effort_treats_text_as_missing() {
        assert_eq!(parse_effort(" 2.5 "), Some(2.5));
        assert_eq!(parse_effort(""), None);
        assert_eq!(parse_effort("nan"), None);
        assert_eq!(parse_effort("about four"), None);
    }
}
