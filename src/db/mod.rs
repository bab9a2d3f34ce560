//! Database abstraction layer
//!
//! The importer talks to a [`Database`]; the PostgreSQL session is the one
//! real implementation, tests use an in-memory recorder.

pub mod ddl;
pub mod postgres;
pub mod types;

use crate::config::Delimiter;
use crate::error::{DbResult, ImportResult};
use std::path::Path;

// Re-export main types
pub use postgres::Session;
pub use types::{ColumnDef, ColumnValues, DataType, LoadSummary};

/// Operations the import pipeline needs from a database
#[allow(async_fn_in_trait)]
pub trait Database {
    /// Run one statement in autocommit mode, returning the affected row count.
    async fn execute(&mut self, statement: &str) -> DbResult<u64>;

    /// Replace `table` with the content of the delimited file at `path`.
    ///
    /// The table is dropped, recreated from the inferred schema and filled
    /// in one transaction: on error the previous table is left untouched.
    async fn load_table(
        &mut self,
        path: &Path,
        table: &str,
        delimiter: Delimiter,
    ) -> ImportResult<LoadSummary>;
}
