//! tabload - Bulk-load a directory of delimited text files into PostgreSQL
//!
//! tabload connects to a PostgreSQL server, makes sure the target database
//! exists, and replaces one table per delimited file found in a directory.
//! Table names come from the filenames, column types are inferred from the
//! file content.
//!
//! # Architecture
//!
//! - [`config`]: Connection parameters, import settings, credential prompt
//! - [`db`]: The [`db::Database`] trait and the PostgreSQL [`db::Session`]
//! - [`tabular`]: Delimited file parsing and column type inference
//! - [`importer`]: Directory scan that drives one load per file
//! - [`error`]: Error types and result aliases
//!
//! # Example
//!
//! ```no_run
//! use tabload::config::{ConnectionConfig, Delimiter};
//! use tabload::db::Session;
//! use tabload::importer::DirectoryImporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::new("localhost", 5432, "postgres", None, "sales")?;
//!
//! let mut admin = Session::connect(&config.with_database("postgres")).await?;
//! admin.ensure_database(&config.database).await?;
//!
//! let mut session = Session::connect(&config).await?;
//! let report = DirectoryImporter::new("data", "csv", Delimiter::Comma)
//!     .import_all(&mut session)
//!     .await?;
//! println!("{} tables loaded", report.loaded.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod importer;
pub mod tabular;

pub use error::{ConfigError, DbError, ImportError};
