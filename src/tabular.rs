//! Delimited text parsing with column type inference
//!
//! A file is read completely before anything touches the database, so a
//! file that fails to parse never leaves a half-written table behind.
//!
//! Conventions:
//! - the first record is the header; blank header cells become
//!   `Unnamed: <index>` and repeated names get `.1`, `.2`, ... suffixes
//! - short records are padded with NULL, long records are rejected
//! - common missing-value markers (`NA`, `null`, `NaN`, ...) load as NULL

use crate::config::Delimiter;
use crate::db::types::{ColumnDef, ColumnValues};
use crate::error::{ImportError, ImportResult};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Strings treated as missing values
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Why a file could not be turned into a table
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("No columns to parse from file")]
    Empty,

    #[error("Expected {expected} fields in line {line}, saw {saw}")]
    TooManyFields {
        expected: usize,
        line: u64,
        saw: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// A parsed file: column definitions plus equally long typed columns
#[derive(Debug, Clone)]
pub struct TabularData {
    pub columns: Vec<ColumnDef>,
    pub values: Vec<ColumnValues>,
    row_count: usize,
}

impl TabularData {
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Header plus the first `rows` rows, one line each, for debug logging.
    pub fn preview(&self, rows: usize) -> String {
        let mut lines = Vec::with_capacity(rows + 1);
        lines.push(
            self.columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(" | "),
        );
        for row in 0..rows.min(self.row_count) {
            lines.push(
                self.values
                    .iter()
                    .map(|col| col.display(row))
                    .collect::<Vec<_>>()
                    .join(" | "),
            );
        }
        lines.join("\n")
    }
}

/// Read and parse one delimited file.
pub fn read_delimited(path: &Path, delimiter: Delimiter) -> ImportResult<TabularData> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_delimited(file, delimiter).map_err(|e| match e {
        ParseError::Csv(err) if err.is_io_error() => ImportError::Io {
            path: path.to_path_buf(),
            source: io::Error::from(err),
        },
        other => ImportError::Parse {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })
}

/// Parse delimited text from any reader.
pub fn parse_delimited<R: Read>(
    reader: R,
    delimiter: Delimiter,
) -> Result<TabularData, ParseError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = rdr.records();

    let header = records.next().ok_or(ParseError::Empty)??;
    let names = header_names(&header);
    let width = names.len();

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut row_count = 0;
    for record in records {
        let record = record?;
        if record.len() > width {
            return Err(ParseError::TooManyFields {
                expected: width,
                line: record.position().map_or(0, |p| p.line()),
                saw: record.len(),
            });
        }
        for (col, cells) in raw.iter_mut().enumerate() {
            let cell = record.get(col).filter(|v| !is_missing(v));
            cells.push(cell.map(String::from));
        }
        row_count += 1;
    }

    let values: Vec<ColumnValues> = raw.into_iter().map(infer_column).collect();
    debug_assert!(values.iter().all(|col| col.len() == row_count));
    let columns = names
        .into_iter()
        .zip(&values)
        .map(|(name, col)| ColumnDef {
            name,
            data_type: col.data_type(),
        })
        .collect();

    Ok(TabularData {
        columns,
        values,
        row_count,
    })
}

fn header_names(header: &csv::StringRecord) -> Vec<String> {
    let mut used = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let raw = if i == 0 {
                raw.trim_start_matches('\u{feff}')
            } else {
                raw
            };
            let base = if raw.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                raw.to_string()
            };

            let mut name = base.clone();
            let mut suffix = 0;
            while used.contains(&name) {
                suffix += 1;
                name = format!("{}.{}", base, suffix);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn is_missing(value: &str) -> bool {
    NA_VALUES.contains(&value)
}

/// Pick the narrowest type every non-null cell parses as.
fn infer_column(raw: Vec<Option<String>>) -> ColumnValues {
    if raw.iter().all(Option::is_none) {
        return ColumnValues::Text(raw);
    }
    if let Some(v) = convert(&raw, |s| s.parse::<i64>().ok()) {
        return ColumnValues::BigInt(v);
    }
    if let Some(v) = convert(&raw, |s| s.parse::<f64>().ok()) {
        return ColumnValues::Double(v);
    }
    if let Some(v) = convert(&raw, parse_bool) {
        return ColumnValues::Boolean(v);
    }
    if let Some(v) = convert(&raw, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()) {
        return ColumnValues::Date(v);
    }
    if let Some(v) = convert(&raw, parse_timestamp) {
        return ColumnValues::Timestamp(v);
    }
    ColumnValues::Text(raw)
}

fn convert<T>(
    raw: &[Option<String>],
    parse: impl Fn(&str) -> Option<T>,
) -> Option<Vec<Option<T>>> {
    raw.iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(s) => parse(s.trim()).map(Some),
        })
        .collect()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
