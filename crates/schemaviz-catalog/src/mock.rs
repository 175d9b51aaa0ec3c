//! Mock catalog adapter for testing
//!
//! This adapter returns predefined tables without connecting to any database.
//! It's useful for:
//! - Unit testing inference and graph assembly end to end
//! - Exercising the reader's error propagation
//! - Checking that callers always close the connection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaviz_catalog::{MockAdapter, CatalogAdapter};
//! use schemaviz_core::Column;
//!
//! let adapter = MockAdapter::new();
//! adapter.add_table("customers", vec![
//!     Column::primary("id", "int"),
//!     Column::new("name", "varchar(255)"),
//! ]).await;
//!
//! let tables = adapter.list_tables().await?;
//! ```
//!
//! ## Simulating Failures
//!
//! ```rust,ignore
//! // Simulate connection failure
//! let adapter = MockAdapter::new().with_connection_failure();
//! assert!(adapter.list_tables().await.is_err());
//!
//! // Fail when one table is described
//! adapter.add_error_for_table("orders", FetchError::QueryError("boom".into())).await;
//! ```

use crate::adapter::{CatalogAdapter, FetchError};
use schemaviz_core::Column;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock catalog adapter for testing
///
/// Tables are listed in insertion order. Clones share state, so a test can
/// keep a handle and inspect it after passing the adapter to other code.
pub struct MockAdapter {
    /// Predefined tables in listing order
    tables: Arc<RwLock<Vec<(String, Vec<Column>)>>>,

    /// Errors to return when describing specific tables
    errors: Arc<RwLock<HashMap<String, FetchError>>>,

    /// Simulate connection failure
    fail_connection: bool,

    /// Set once `close()` has been called
    closed: Arc<AtomicBool>,

    /// Number of `describe_table` calls made
    describe_calls: Arc<AtomicUsize>,
}

impl MockAdapter {
    /// Create a new mock adapter with no tables
    pub fn new() -> Self {
        Self::from_tables(Vec::new())
    }

    /// Create a mock adapter from a pre-built list of tables
    pub fn from_tables(tables: Vec<(String, Vec<Column>)>) -> Self {
        Self {
            tables: Arc::new(RwLock::new(tables)),
            errors: Arc::new(RwLock::new(HashMap::new())),
            fail_connection: false,
            closed: Arc::new(AtomicBool::new(false)),
            describe_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a table; it is listed after the ones already added
    pub async fn add_table(&self, name: impl Into<String>, columns: Vec<Column>) {
        self.tables.write().await.push((name.into(), columns));
    }

    /// Configure an error to be returned when describing a specific table
    pub async fn add_error_for_table(&self, table: impl Into<String>, error: FetchError) {
        self.errors.write().await.insert(table.into(), error);
    }

    /// Configure every request to fail as if the server were unreachable
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of `describe_table` calls made so far
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    fn check_connection(&self) -> Result<(), FetchError> {
        if self.fail_connection {
            return Err(FetchError::ConnectionError(
                "Simulated connection failure".to_string(),
            ));
        }
        if self.is_closed() {
            return Err(FetchError::ConnectionError(
                "connection already closed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockAdapter {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            errors: Arc::clone(&self.errors),
            fail_connection: self.fail_connection,
            closed: Arc::clone(&self.closed),
            describe_calls: Arc::clone(&self.describe_calls),
        }
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        self.check_connection()
    }

    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        self.check_connection()?;

        Ok(self
            .tables
            .read()
            .await
            .iter()
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn describe_table(&self, table: &str) -> Result<Vec<Column>, FetchError> {
        self.check_connection()?;
        self.describe_calls.fetch_add(1, Ordering::SeqCst);

        // Check for configured errors first
        if let Some(error) = self.errors.read().await.get(table) {
            return Err(error.clone());
        }

        self.tables
            .read()
            .await
            .iter()
            .find(|(name, _)| name == table)
            .map(|(_, columns)| columns.clone())
            .ok_or_else(|| FetchError::TableNotFound(table.to_string()))
    }

    async fn close(&self) -> Result<(), FetchError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Builder for creating MockAdapter with multiple tables
///
/// # Example
///
/// ```rust,ignore
/// let adapter = MockAdapterBuilder::new()
///     .with_table("customers", vec![Column::primary("id", "int")])
///     .with_table("orders", vec![
///         Column::primary("id", "int"),
///         Column::new("customer_id", "int"),
///     ])
///     .build();
/// ```
pub struct MockAdapterBuilder {
    tables: Vec<(String, Vec<Column>)>,
    errors: HashMap<String, FetchError>,
    fail_connection: bool,
}

impl MockAdapterBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            errors: HashMap::new(),
            fail_connection: false,
        }
    }

    /// Add a table
    pub fn with_table(mut self, name: impl Into<String>, columns: Vec<Column>) -> Self {
        self.tables.push((name.into(), columns));
        self
    }

    /// Add an error for a table
    pub fn with_error(mut self, table: impl Into<String>, error: FetchError) -> Self {
        self.errors.insert(table.into(), error);
        self
    }

    /// Enable connection failure simulation
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Build the MockAdapter
    pub fn build(self) -> MockAdapter {
        let mut adapter = MockAdapter::from_tables(self.tables);
        adapter.errors = Arc::new(RwLock::new(self.errors));
        adapter.fail_connection = self.fail_connection;
        adapter
    }
}

impl Default for MockAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
