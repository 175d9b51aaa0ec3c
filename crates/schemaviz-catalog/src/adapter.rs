//! Catalog adapter trait for reading table metadata

use schemaviz_core::{Column, ConfigError};

/// Errors that can occur when reading metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<ConfigError> for FetchError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Trait for adapters that can list tables and describe their columns
///
/// Adapters own a single connection. Callers issue requests one at a time
/// and must call [`CatalogAdapter::close`] when done, whatever the outcome.
#[async_trait::async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Get the adapter name (e.g., "MySQL")
    fn name(&self) -> &'static str;

    /// Test the connection to the database
    async fn test_connection(&self) -> Result<(), FetchError>;

    /// List the names of all tables in the connected database
    async fn list_tables(&self) -> Result<Vec<String>, FetchError>;

    /// Describe the columns of one table, in ordinal order
    async fn describe_table(&self, table: &str) -> Result<Vec<Column>, FetchError>;

    /// Close the underlying connection
    ///
    /// Closing an already closed adapter is a no-op.
    async fn close(&self) -> Result<(), FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts() {
        let err: FetchError = ConfigError::MissingField("database").into();
        assert!(matches!(err, FetchError::ConfigError(_)));
        assert!(err.to_string().contains("database"));
    }
}
