//! Common test utilities and helpers
//!
//! Shared test infrastructure for integration tests.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tabload::config::{ConnectionConfig, SslMode};
use tabload::db::Session;

/// Get test database connection config
pub fn test_config() -> ConnectionConfig {
    let password =
        std::env::var("TEST_DB_PASSWORD").unwrap_or_else(|_| "test_password".to_string());
    ConnectionConfig::new(
        &std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        std::env::var("TEST_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5433),
        &std::env::var("TEST_DB_USER").unwrap_or_else(|_| "test_user".to_string()),
        Some(password),
        &std::env::var("TEST_DB_NAME").unwrap_or_else(|_| "test_db".to_string()),
    )
    .expect("test config is valid")
    .with_ssl_mode(SslMode::Disable)
}

/// Connect to the test database, or `None` with a message if it is down.
pub async fn connect_or_skip() -> Option<Session> {
    let config = test_config();
    match Session::connect(&config).await {
        Ok(session) => Some(session),
        Err(e) => {
            eprintln!(
                "Skipping test: Database not available at {} - {}",
                config.address(),
                e
            );
            None
        }
    }
}

/// Lowercase name unlikely to clash with other test runs
pub fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("{}_{}_{}", prefix, std::process::id(), nanos)
}

pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write fixture");
}
