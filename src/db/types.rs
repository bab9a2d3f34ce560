//! Database type definitions
//!
//! Column types inferred from delimited files and the typed column storage
//! handed to the bulk loader.

use chrono::{NaiveDate, NaiveDateTime};
use tokio_postgres::types::{ToSql, Type};

/// Column types a tabular file can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    BigInt,
    Double,
    Boolean,
    Date,
    Timestamp,
    Text,
}

/// Column definition of a loaded table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name, taken verbatim from the header
    pub name: String,
    /// Data type
    pub data_type: DataType,
}

/// Values of one column, in row order. `None` is SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    BigInt(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Date(Vec<Option<NaiveDate>>),
    Timestamp(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

/// Outcome of a successful table load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub columns: usize,
    pub rows: u64,
}

impl DataType {
    /// Type name used in `CREATE TABLE`
    pub fn sql_name(&self) -> &'static str {
        match self {
            DataType::BigInt => "BIGINT",
            DataType::Double => "DOUBLE PRECISION",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Text => "TEXT",
        }
    }

    /// Wire type used by binary COPY
    pub fn pg_type(&self) -> Type {
        match self {
            DataType::BigInt => Type::INT8,
            DataType::Double => Type::FLOAT8,
            DataType::Boolean => Type::BOOL,
            DataType::Date => Type::DATE,
            DataType::Timestamp => Type::TIMESTAMP,
            DataType::Text => Type::TEXT,
        }
    }
}

impl ColumnValues {
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnValues::BigInt(_) => DataType::BigInt,
            ColumnValues::Double(_) => DataType::Double,
            ColumnValues::Boolean(_) => DataType::Boolean,
            ColumnValues::Date(_) => DataType::Date,
            ColumnValues::Timestamp(_) => DataType::Timestamp,
            ColumnValues::Text(_) => DataType::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::BigInt(v) => v.len(),
            ColumnValues::Double(v) => v.len(),
            ColumnValues::Boolean(v) => v.len(),
            ColumnValues::Date(v) => v.len(),
            ColumnValues::Timestamp(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` as a COPY parameter.
    ///
    /// Panics if `row` is out of bounds.
    pub fn param(&self, row: usize) -> &(dyn ToSql + Sync) {
        match self {
            ColumnValues::BigInt(v) => &v[row],
            ColumnValues::Double(v) => &v[row],
            ColumnValues::Boolean(v) => &v[row],
            ColumnValues::Date(v) => &v[row],
            ColumnValues::Timestamp(v) => &v[row],
            ColumnValues::Text(v) => &v[row],
        }
    }

    /// Display string for previews (NULL shown as `NULL`)
    pub fn display(&self, row: usize) -> String {
        fn show<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "NULL".to_string(), T::to_string)
        }
        match self {
            ColumnValues::BigInt(v) => show(&v[row]),
            ColumnValues::Double(v) => show(&v[row]),
            ColumnValues::Boolean(v) => show(&v[row]),
            ColumnValues::Date(v) => show(&v[row]),
            ColumnValues::Timestamp(v) => show(&v[row]),
            ColumnValues::Text(v) => show(&v[row]),
        }
    }
}
