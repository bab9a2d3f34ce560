//! Error types for tabload
//!
//! This module defines the error hierarchy used throughout the importer.
//! We use `thiserror` for library-style errors with clear error chains.

use std::io;
use std::path::PathBuf;

/// Database operation errors
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Failed to establish connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Statement execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Replacing a table's content failed; the transaction was rolled back
    #[error("Loading table '{table}' failed: {reason}")]
    LoadFailed { table: String, reason: String },
}

/// Errors raised while importing a directory or a single file
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Import directory is missing
    #[error("Directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Directory exists but could not be listed
    #[error("Failed to read directory '{}': {source}", .path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    /// File could not be opened or read
    #[error("Failed to read '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// File content is not valid delimited text
    #[error(
        "'{}' could not be parsed: {reason}. Check the delimiter and file format",
        .path.display()
    )]
    Parse { path: PathBuf, reason: String },

    /// Filename yields no usable table name
    #[error("Cannot derive a table name from '{0}'")]
    InvalidTableName(String),

    /// Another file in the same run already maps to this table
    #[error("Table '{table}' from '{file}' was already loaded from '{previous}'")]
    TableNameCollision {
        table: String,
        file: String,
        previous: String,
    },

    /// Server-side failure while loading
    #[error(transparent)]
    Database(#[from] DbError),
}

/// Configuration and prompt errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Standard input closed before all parameters were collected
    #[error("Input closed while reading {0}")]
    InputClosed(&'static str),

    /// Terminal IO failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for database operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Specialized Result type for import operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Specialized Result type for config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
