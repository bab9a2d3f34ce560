//! PostgreSQL database session
//!
//! Concrete implementation using tokio-postgres.

use crate::config::{ConnectionConfig, Delimiter, SslMode};
use crate::db::Database;
use crate::db::ddl;
use crate::db::types::LoadSummary;
use crate::error::{DbError, DbResult, ImportResult};
use crate::tabular::{self, TabularData};
use futures::pin_mut;
use std::future::Future;
use std::path::Path;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, SimpleQueryMessage};
use tracing::{debug, error, info};

/// Rows shown in the debug preview of each loaded file
const PREVIEW_ROWS: usize = 5;

/// A live connection to one database on a PostgreSQL server
pub struct Session {
    /// The tokio-postgres client
    client: Client,
    /// Database this session is connected to
    database: String,
}

impl Session {
    /// Connect to a PostgreSQL database.
    ///
    /// The connection driver runs as a background task; if the server drops
    /// the connection later, the task logs it and subsequent calls fail.
    pub async fn connect(config: &ConnectionConfig) -> DbResult<Self> {
        let conn_string = config.connection_string_with_password();
        let address = config.address();

        let client = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) =
                    tokio_postgres::connect(&conn_string, tokio_postgres::NoTls)
                        .await
                        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                spawn_connection(connection, address.clone());
                client
            }
            SslMode::Prefer | SslMode::Require => {
                let tls_config = make_tls_config();
                let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);
                let (client, connection) = tokio_postgres::connect(&conn_string, tls)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                spawn_connection(connection, address.clone());
                client
            }
        };

        info!(
            "Connected to PostgreSQL server at {} (database '{}')",
            address, config.database
        );

        Ok(Self {
            client,
            database: config.database.clone(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Create `name` unless it already exists.
    ///
    /// Returns `true` if this call created the database. A concurrent
    /// creation between the lookup and the `CREATE` counts as existing.
    pub async fn ensure_database(&mut self, name: &str) -> DbResult<bool> {
        let existing = self
            .client
            .query_opt("SELECT 1 FROM pg_database WHERE datname = $1", &[&name])
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;

        if existing.is_some() {
            info!("Database '{}' already exists", name);
            return Ok(false);
        }

        match self.run_simple(&ddl::create_database_sql(name)).await {
            Ok(_) => {
                info!("Created database '{}'", name);
                Ok(true)
            }
            Err(e) if e.code() == Some(&SqlState::DUPLICATE_DATABASE) => {
                info!("Database '{}' already exists", name);
                Ok(false)
            }
            Err(e) => Err(DbError::QueryFailed(e.to_string())),
        }
    }

    /// Run a statement over the simple query protocol.
    ///
    /// Statements like `CREATE DATABASE` refuse to run inside the implicit
    /// transaction of the extended protocol.
    async fn run_simple(&self, statement: &str) -> Result<u64, tokio_postgres::Error> {
        let messages = self.client.simple_query(statement).await?;
        Ok(messages
            .iter()
            .map(|m| match m {
                SimpleQueryMessage::CommandComplete(n) => *n,
                _ => 0,
            })
            .sum())
    }

    /// Drop, recreate and fill `table` inside one transaction.
    async fn replace_table(
        &mut self,
        table: &str,
        data: &TabularData,
    ) -> Result<u64, tokio_postgres::Error> {
        let tx = self.client.transaction().await?;

        tx.batch_execute(&ddl::drop_table_sql(table)).await?;
        tx.batch_execute(&ddl::create_table_sql(table, &data.columns))
            .await?;

        let copy = ddl::copy_in_sql(table, &data.columns);
        let sink = tx.copy_in(copy.as_str()).await?;
        let types: Vec<Type> = data.columns.iter().map(|c| c.data_type.pg_type()).collect();
        let writer = BinaryCopyInWriter::new(sink, &types);
        pin_mut!(writer);

        let mut row: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(data.values.len());
        for i in 0..data.row_count() {
            row.clear();
            row.extend(data.values.iter().map(|col| col.param(i)));
            writer.as_mut().write(&row).await?;
        }
        let written = writer.finish().await?;

        tx.commit().await?;
        Ok(written)
    }
}

impl Database for Session {
    async fn execute(&mut self, statement: &str) -> DbResult<u64> {
        debug!("Executing: {}", statement);
        let rows = self
            .run_simple(statement)
            .await
            .map_err(|e| DbError::QueryFailed(e.to_string()))?;
        info!("Query executed successfully: {}", statement);
        Ok(rows)
    }

    async fn load_table(
        &mut self,
        path: &Path,
        table: &str,
        delimiter: Delimiter,
    ) -> ImportResult<LoadSummary> {
        let data = tabular::read_delimited(path, delimiter)?;
        debug!(
            "Preview of data for table '{}':\n{}",
            table,
            data.preview(PREVIEW_ROWS)
        );

        let rows = self
            .replace_table(table, &data)
            .await
            .map_err(|e| DbError::LoadFailed {
                table: table.to_string(),
                reason: e.to_string(),
            })?;

        Ok(LoadSummary {
            table: table.to_string(),
            columns: data.columns.len(),
            rows,
        })
    }
}

/// Drive a connection in the background, logging if it ends with an error.
fn spawn_connection<F>(connection: F, address: String)
where
    F: Future<Output = Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("Connection to {} lost: {}", address, e);
        }
    });
}

/// Build a rustls ClientConfig that trusts OS certificates (with Mozilla roots as fallback)
fn make_tls_config() -> rustls::ClientConfig {
    let mut root_store = rustls::RootCertStore::empty();

    let native_certs = rustls_native_certs::load_native_certs();
    let mut loaded = 0;
    for cert in native_certs.certs {
        if root_store.add(cert).is_ok() {
            loaded += 1;
        }
    }
    if loaded == 0 {
        debug!("No native root certificates found, using bundled webpki roots");
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}
