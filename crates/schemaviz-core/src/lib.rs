//! schemaviz core
//!
//! Relational facts read from a database (tables, columns, key roles) and
//! the connection configuration used to reach it.

pub mod schema;
pub mod config;

pub use schema::{Column, KeyRole, Table, SchemaSnapshot};
pub use config::{
    ConnectionConfig, ConnectionOverrides, ConfigError, MysqlSection, CONFIG_SECTION, DEFAULT_CONFIG_FILE,
    DEFAULT_HOST, DEFAULT_PORT,
};
