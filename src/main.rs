//! tabload - Bulk-load a directory of delimited files into PostgreSQL
//!
//! This is the main entry point for the tabload binary.
//! The actual logic is in the library modules for better testability.

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tabload::config::prompt::collect_credentials;
use tabload::config::{ConnectionConfig, Delimiter, Settings, SslMode};
use tabload::db::{Database, Session};
use tabload::importer::{DirectoryImporter, ImportReport};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Bulk-load a directory of delimited files into PostgreSQL tables.
///
/// Connection parameters are asked for interactively.
#[derive(Debug, Parser)]
#[command(name = "tabload", version)]
struct Cli {
    /// Directory holding the files to import [default: data]
    #[arg(long)]
    dir: Option<PathBuf>,

    /// File extension to import [default: csv]
    #[arg(long)]
    extension: Option<String>,

    /// Field delimiter of the files [default: comma]
    #[arg(long, value_enum)]
    delimiter: Option<Delimiter>,

    /// TLS mode for the server connection [default: prefer]
    #[arg(long, value_enum)]
    sslmode: Option<SslMode>,

    /// Database used while creating the target database [default: postgres]
    #[arg(long)]
    maintenance_db: Option<String>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Exit with a failure status if any step fails
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            directory: self.dir.clone().unwrap_or(defaults.directory),
            extension: self.extension.clone().unwrap_or(defaults.extension),
            delimiter: self.delimiter.unwrap_or(defaults.delimiter),
            maintenance_database: self
                .maintenance_db
                .clone()
                .unwrap_or(defaults.maintenance_database),
            ssl_mode: self.sslmode.unwrap_or(defaults.ssl_mode),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.settings();

    // Scoped to this thread; the runtime is single-threaded so the
    // connection tasks log through it too.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    let _log_guard = tracing::subscriber::set_default(subscriber);

    let config = collect_credentials(&mut io::stdin().lock(), &mut io::stdout(), |prompt| {
        rpassword::prompt_password(prompt)
    })?
    .with_ssl_mode(settings.ssl_mode);

    let succeeded = run(&config, &settings).await;
    Ok(ExitCode::from(exit_status(succeeded, cli.strict)))
}

/// Process status: failures only count under `--strict`.
fn exit_status(succeeded: bool, strict: bool) -> u8 {
    if !succeeded && strict { 1 } else { 0 }
}

/// Ensure the database exists and import the directory.
///
/// Every failure is logged here. Returns `true` when every step and every
/// file succeeded.
async fn run(config: &ConnectionConfig, settings: &Settings) -> bool {
    let admin_config = config.with_database(&settings.maintenance_database);
    let mut admin = match Session::connect(&admin_config).await {
        Ok(session) => session,
        Err(e) => {
            error!(
                "Error occurred while connecting to {}: {}",
                admin_config.address(),
                e
            );
            return false;
        }
    };
    if let Err(e) = admin.ensure_database(&config.database).await {
        error!("Could not create database '{}': {}", config.database, e);
        return false;
    }
    drop(admin);

    let mut session = match Session::connect(config).await {
        Ok(session) => session,
        Err(e) => {
            error!(
                "Error occurred while connecting to database '{}': {}",
                config.database, e
            );
            return false;
        }
    };

    info!("Importing into database '{}'", session.database());
    import_into(&mut session, settings).await
}

/// Import the configured directory through `db`, logging the outcome.
async fn import_into<D: Database>(db: &mut D, settings: &Settings) -> bool {
    let importer = DirectoryImporter::from_settings(settings);
    info!("Importing files from '{}'", importer.directory().display());
    match importer.import_all(db).await {
        Ok(report) => {
            log_summary(&report);
            !report.has_failures()
        }
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

fn log_summary(report: &ImportReport) {
    info!(
        "Import finished: {} tables loaded ({} rows), {} entries skipped, {} failed",
        report.loaded.len(),
        report.rows_loaded(),
        report.skipped.len(),
        report.failed.len()
    );
    for failed in &report.failed {
        warn!("Not imported: {} ({})", failed.file, failed.error);
    }
}
