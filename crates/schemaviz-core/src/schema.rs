//! Tables, columns and key roles as reported by the database

use serde::{Deserialize, Serialize};

/// Role a column plays in its table's keys
///
/// Mirrors MySQL's `COLUMN_KEY` values. Only [`KeyRole::Primary`] affects
/// relationship inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Not part of any index
    #[default]
    None,

    /// Part of the primary key (`PRI`)
    Primary,

    /// Part of a unique index (`UNI`)
    Unique,

    /// First column of a non-unique index (`MUL`)
    Multiple,
}

impl KeyRole {
    /// Parse a MySQL `COLUMN_KEY` / `DESCRIBE` key value
    ///
    /// Unknown values map to [`KeyRole::None`].
    pub fn from_mysql(key: &str) -> Self {
        match key.trim().to_uppercase().as_str() {
            "PRI" => Self::Primary,
            "UNI" => Self::Unique,
            "MUL" => Self::Multiple,
            _ => Self::None,
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary)
    }
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, ""),
            Self::Primary => write!(f, "PRI"),
            Self::Unique => write!(f, "UNI"),
            Self::Multiple => write!(f, "MUL"),
        }
    }
}

/// A column in a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Declared type exactly as the database reports it (e.g. `int(11)`)
    pub column_type: String,

    /// Key role
    pub key: KeyRole,
}

impl Column {
    /// Create a new column with no key role
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            key: KeyRole::None,
        }
    }

    /// Create a primary key column
    pub fn primary(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self::new(name, column_type).with_key(KeyRole::Primary)
    }

    /// Set key role
    pub fn with_key(mut self, key: KeyRole) -> Self {
        self.key = key;
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.key.is_primary()
    }
}

/// A table and its ordered columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, original casing
    pub name: String,

    /// Columns in ordinal order
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Find a column by exact name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the primary key columns
    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Every table of one database, in the order the database listed them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: Vec<Table>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot from tables
    pub fn from_tables(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Append a table
    pub fn push(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Find a table by name, ignoring case
    ///
    /// Returns the first match in snapshot order.
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        let wanted = name.to_lowercase();
        self.tables.iter().find(|t| t.name.to_lowercase() == wanted)
    }

    /// Table names in snapshot order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of columns across all tables
    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }
}
