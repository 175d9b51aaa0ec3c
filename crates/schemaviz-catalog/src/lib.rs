//! Catalog adapters for reading table and column metadata
//!
//! An adapter answers two questions about the connected database: which
//! tables exist, and what columns each table has. [`read_schema`] drives an
//! adapter to produce a full [`schemaviz_core::SchemaSnapshot`].
//!
//! ## Features
//!
//! - `mysql` (default) - MySQL/MariaDB support via sqlx
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemaviz_catalog::{MySqlAdapter, CatalogAdapter, read_schema};
//!
//! let adapter = MySqlAdapter::connect(&config).await?;
//! let snapshot = read_schema(&adapter).await;
//! adapter.close().await?;
//! ```

pub mod adapter;
pub mod mock;
pub mod mysql;
pub mod reader;

pub use adapter::{CatalogAdapter, FetchError};
pub use mock::{MockAdapter, MockAdapterBuilder};
pub use mysql::MySqlAdapter;
pub use reader::read_schema;
