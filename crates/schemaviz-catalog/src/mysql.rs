//! MySQL catalog adapter using information_schema
//!
//! This adapter reads `information_schema.TABLES` and
//! `information_schema.COLUMNS` for the connected database. The result sets
//! are the same as `SHOW TABLES` and `DESCRIBE <table>`, but every value is
//! cast to text so the driver can decode it the same way on MySQL 5.7, 8.x
//! and MariaDB.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let config = ConnectionConfig::resolve(overrides, Path::new("config.ini"))?;
//! let adapter = MySqlAdapter::connect(&config).await?;
//! let tables = adapter.list_tables().await?;
//! adapter.close().await?;
//! ```
//!
//! Reference: https://dev.mysql.com/doc/refman/8.0/en/information-schema-columns-table.html

use crate::adapter::{CatalogAdapter, FetchError};
use schemaviz_core::{Column, ConnectionConfig};

#[cfg(feature = "mysql")]
use schemaviz_core::KeyRole;

#[cfg(feature = "mysql")]
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

#[cfg(feature = "mysql")]
use sqlx::{Connection, Row};

#[cfg(feature = "mysql")]
use tokio::sync::Mutex;

#[cfg(feature = "mysql")]
const LIST_TABLES_SQL: &str = r#"
    SELECT CAST(TABLE_NAME AS CHAR) AS table_name
    FROM information_schema.TABLES
    WHERE TABLE_SCHEMA = DATABASE()
    ORDER BY TABLE_NAME
"#;

#[cfg(feature = "mysql")]
const DESCRIBE_TABLE_SQL: &str = r#"
    SELECT
        CAST(COLUMN_NAME AS CHAR) AS column_name,
        CAST(COLUMN_TYPE AS CHAR) AS column_type,
        CAST(COLUMN_KEY AS CHAR) AS column_key
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE()
      AND TABLE_NAME = ?
    ORDER BY ORDINAL_POSITION
"#;

/// SQLSTATE reported for "Access denied"
#[cfg(feature = "mysql")]
const SQLSTATE_ACCESS_DENIED: &str = "28000";

/// MySQL catalog adapter
///
/// Holds one connection for its whole lifetime. Requests are serialized
/// through a mutex; [`CatalogAdapter::close`] drops the connection.
pub struct MySqlAdapter {
    /// Open connection, `None` once closed
    #[cfg(feature = "mysql")]
    connection: Mutex<Option<MySqlConnection>>,

    /// Connection host
    host: String,

    /// Connection port
    port: u16,

    /// Database name
    database: String,
}

impl MySqlAdapter {
    /// Connect using a resolved connection config
    ///
    /// Fails with [`FetchError::ConfigError`] if user or database were never
    /// configured, before any network traffic happens. A missing password
    /// is sent as an empty one.
    #[cfg(feature = "mysql")]
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, FetchError> {
        let user = config.require_user()?;
        let database = config.require_database()?;

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(user)
            .password(config.password_or_empty())
            .database(database);

        tracing::debug!(host = %config.host, port = config.port, database, "connecting to MySQL");

        let connection = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| connect_error(&config.host, config.port, e))?;

        Ok(Self {
            connection: Mutex::new(Some(connection)),
            host: config.host.clone(),
            port: config.port,
            database: database.to_string(),
        })
    }

    /// Create adapter without mysql feature (returns error)
    #[cfg(not(feature = "mysql"))]
    pub async fn connect(_config: &ConnectionConfig) -> Result<Self, FetchError> {
        Err(disabled())
    }

    /// Get the connection host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the connection port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the database name
    pub fn database(&self) -> &str {
        &self.database
    }
}

#[cfg(feature = "mysql")]
fn connect_error(host: &str, port: u16, err: sqlx::Error) -> FetchError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(SQLSTATE_ACCESS_DENIED) => {
            FetchError::AuthenticationError(format!("{}:{}: {}", host, port, db.message()))
        }
        _ => FetchError::ConnectionError(format!(
            "Failed to connect to MySQL at {}:{}: {}",
            host, port, err
        )),
    }
}

#[cfg(feature = "mysql")]
fn decode_error(err: sqlx::Error) -> FetchError {
    FetchError::InvalidResponse(err.to_string())
}

#[cfg(not(feature = "mysql"))]
fn disabled() -> FetchError {
    FetchError::ConfigError(
        "MySQL support not compiled. Rebuild with: cargo build --features mysql".to_string(),
    )
}

#[cfg(feature = "mysql")]
fn closed() -> FetchError {
    FetchError::ConnectionError("connection already closed".to_string())
}

#[async_trait::async_trait]
impl CatalogAdapter for MySqlAdapter {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    #[cfg(feature = "mysql")]
    async fn test_connection(&self) -> Result<(), FetchError> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or_else(closed)?;

        connection
            .ping()
            .await
            .map_err(|e| FetchError::ConnectionError(format!("Connection test failed: {}", e)))
    }

    #[cfg(feature = "mysql")]
    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or_else(closed)?;

        let rows = sqlx::query(LIST_TABLES_SQL)
            .fetch_all(&mut *connection)
            .await
            .map_err(|e| FetchError::QueryError(e.to_string()))?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("table_name").map_err(decode_error))
            .collect()
    }

    #[cfg(feature = "mysql")]
    async fn describe_table(&self, table: &str) -> Result<Vec<Column>, FetchError> {
        let mut guard = self.connection.lock().await;
        let connection = guard.as_mut().ok_or_else(closed)?;

        let rows = sqlx::query(DESCRIBE_TABLE_SQL)
            .bind(table)
            .fetch_all(&mut *connection)
            .await
            .map_err(|e| FetchError::QueryError(format!("Cannot describe {}: {}", table, e)))?;

        let mut columns = Vec::with_capacity(rows.len());

        for row in rows {
            let name: String = row.try_get("column_name").map_err(decode_error)?;
            let column_type: String = row.try_get("column_type").map_err(decode_error)?;
            let key: Option<String> = row.try_get("column_key").map_err(decode_error)?;

            columns.push(
                Column::new(name, column_type)
                    .with_key(KeyRole::from_mysql(key.as_deref().unwrap_or(""))),
            );
        }

        // Every MySQL table has at least one column
        if columns.is_empty() {
            return Err(FetchError::TableNotFound(format!(
                "{}.{} not found or has no columns",
                self.database, table
            )));
        }

        Ok(columns)
    }

    #[cfg(feature = "mysql")]
    async fn close(&self) -> Result<(), FetchError> {
        let Some(connection) = self.connection.lock().await.take() else {
            return Ok(());
        };

        tracing::debug!(host = %self.host, port = self.port, "closing MySQL connection");

        connection
            .close()
            .await
            .map_err(|e| FetchError::ConnectionError(format!("Failed to close connection: {}", e)))
    }

    #[cfg(not(feature = "mysql"))]
    async fn test_connection(&self) -> Result<(), FetchError> {
        Err(disabled())
    }

    #[cfg(not(feature = "mysql"))]
    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        Err(disabled())
    }

    #[cfg(not(feature = "mysql"))]
    async fn describe_table(&self, _table: &str) -> Result<Vec<Column>, FetchError> {
        Err(disabled())
    }

    #[cfg(not(feature = "mysql"))]
    async fn close(&self) -> Result<(), FetchError> {
        Ok(())
    }
}
