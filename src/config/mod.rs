//! Configuration management
//!
//! Handles connection parameters, import settings and the credential prompt.

pub mod connections;
pub mod prompt;
pub mod settings;

pub use connections::{ConnectionConfig, SslMode};
pub use settings::{Delimiter, Settings};
