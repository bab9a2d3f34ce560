//! Import settings
//!
//! Everything except credentials. Defaults reproduce a plain run: comma
//! separated `.csv` files under `./data`.

use crate::config::connections::SslMode;
use std::path::PathBuf;

/// Field delimiter of the files being imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Import settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub directory: PathBuf,
    /// Extension without the leading dot, matched case-insensitively
    pub extension: String,
    pub delimiter: Delimiter,
    /// Database to connect to while creating the target database
    pub maintenance_database: String,
    pub ssl_mode: SslMode,
}

fn default_directory() -> PathBuf {
    PathBuf::from("data")
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_maintenance_database() -> String {
    "postgres".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
            delimiter: Delimiter::default(),
            maintenance_database: default_maintenance_database(),
            ssl_mode: SslMode::default(),
        }
    }
}
