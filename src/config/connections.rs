//! Connection configuration
//!
//! Server coordinates and credentials for one import run. Collected once at
//! startup (see [`crate::config::prompt`]) and never modified afterwards.

use crate::error::{ConfigError, ConfigResult};

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Database host
    pub host: String,

    /// Database port
    pub port: u16,

    /// Database name
    pub database: String,

    /// Username
    pub username: String,

    /// Password
    pub password: Option<String>,

    /// SSL mode
    pub ssl_mode: SslMode,
}

/// SSL connection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SslMode {
    Disable,
    #[default]
    Prefer,
    Require,
}

impl SslMode {
    /// Value of the `sslmode` connection-string key
    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }
}

pub const DEFAULT_PORT: u16 = 5432;

impl ConnectionConfig {
    /// Build a config, normalising host and database name to lowercase.
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: Option<String>,
        database: &str,
    ) -> ConfigResult<Self> {
        let host = host.trim().to_lowercase();
        let database = database.trim().to_lowercase();
        let username = username.trim().to_string();

        if host.is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if username.is_empty() {
            return Err(ConfigError::Invalid("username must not be empty".into()));
        }
        if database.is_empty() {
            return Err(ConfigError::Invalid(
                "database name must not be empty".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            database,
            username,
            password,
            ssl_mode: SslMode::default(),
        })
    }

    /// Same server and credentials, different database.
    ///
    /// Used to reach the maintenance database before the target exists.
    pub fn with_database(&self, database: &str) -> Self {
        Self {
            database: database.to_string(),
            ..self.clone()
        }
    }

    pub fn with_ssl_mode(mut self, ssl_mode: SslMode) -> Self {
        self.ssl_mode = ssl_mode;
        self
    }

    /// Build a PostgreSQL connection string (without password)
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={}",
            quote_value(&self.host),
            self.port,
            quote_value(&self.database),
            quote_value(&self.username)
        )
    }

    /// Build a full connection string including password
    pub fn connection_string_with_password(&self) -> String {
        let with_ssl = format!(
            "{} sslmode={}",
            self.connection_string(),
            self.ssl_mode.as_str()
        );
        if let Some(ref pw) = self.password {
            format!("{} password={}", with_ssl, quote_value(pw))
        } else {
            with_ssl
        }
    }

    /// `host:port` for log lines
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Quote a libpq key/value if it contains spaces, quotes or backslashes.
fn quote_value(value: &str) -> String {
    if !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\')
    {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
