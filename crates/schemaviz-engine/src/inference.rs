//! Relationship inference from column naming conventions
//!
//! A non-primary-key column named `<prefix>_id` (any case) is read as a
//! reference to the table called `<prefix>`, or failing that to its plural
//! (`customer_id` -> `customers`). When such a table exists, and is not the
//! column's own table, the column becomes a [`Relationship`].
//! Otherwise the column is ambiguous: it looks like a reference but there is
//! nothing in the snapshot to point it at.

use once_cell::sync::Lazy;
use regex::Regex;
use schemaviz_core::{Column, SchemaSnapshot};
use serde::Serialize;
use std::collections::HashMap;

static REFERENCE_COLUMN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(.+)_id$").unwrap());

/// A directed reference from one table to another
///
/// `source` holds the referencing column; `target` is the referenced table
/// in its original casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    pub column: String,
}

impl Relationship {
    pub fn new(source: impl Into<String>, target: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            column: column.into(),
        }
    }
}

/// How inference classified a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Part of the primary key; never a reference
    PrimaryKey,

    /// Refers to `target`
    Reference { target: String },

    /// Named like a reference, but no other table matches
    Ambiguous,

    /// Ordinary descriptive column
    Plain,
}

/// A column together with its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedColumn {
    pub column: Column,
    pub role: ColumnRole,
}

/// A column that looks like a reference but resolves to no other table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AmbiguousColumn {
    pub name: String,
    pub column_type: String,
}

/// Inference result for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAnalysis {
    /// Table name, original casing
    pub table: String,

    /// Every column in ordinal order
    pub columns: Vec<AnalyzedColumn>,

    /// Ambiguous columns in ordinal order
    pub ambiguous: Vec<AmbiguousColumn>,
}

impl TableAnalysis {
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous.is_empty()
    }
}

/// Inference result for a whole snapshot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SchemaAnalysis {
    /// Relationships in table order, then column order
    pub relationships: Vec<Relationship>,

    /// One entry per table, in snapshot order
    pub tables: Vec<TableAnalysis>,
}

impl SchemaAnalysis {
    /// Total number of ambiguous columns
    pub fn ambiguous_column_count(&self) -> usize {
        self.tables.iter().map(|t| t.ambiguous.len()).sum()
    }

    /// Find a table's analysis by exact name
    pub fn table(&self, name: &str) -> Option<&TableAnalysis> {
        self.tables.iter().find(|t| t.table == name)
    }
}

/// The `<prefix>` of a column named `<prefix>_id`, case-insensitive
pub fn referenced_prefix(column_name: &str) -> Option<&str> {
    REFERENCE_COLUMN_RE
        .captures(column_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Candidate table names for a prefix, most specific first
fn candidate_names(prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    let mut names = vec![prefix.clone(), format!("{}s", prefix), format!("{}es", prefix)];
    if let Some(stem) = prefix.strip_suffix('y') {
        names.push(format!("{}ies", stem));
    }
    names
}

/// Resolve a prefix against known tables (lower-cased name -> original)
///
/// Returns the lower-cased key and original name of the first candidate hit.
fn resolve_target<'a>(prefix: &str, known_tables: &HashMap<String, &'a str>) -> Option<(String, &'a str)> {
    candidate_names(prefix)
        .into_iter()
        .find_map(|name| known_tables.get(&name).map(|original| (name, *original)))
}

/// Classify every column of every table and collect relationships
pub fn analyze_schema(snapshot: &SchemaSnapshot) -> SchemaAnalysis {
    // Lower-cased name -> original name; the first table listed wins
    let mut known_tables: HashMap<String, &str> = HashMap::new();
    for table in &snapshot.tables {
        known_tables
            .entry(table.name.to_lowercase())
            .or_insert(table.name.as_str());
    }

    let mut analysis = SchemaAnalysis::default();

    for table in &snapshot.tables {
        let own_name = table.name.to_lowercase();
        let mut columns = Vec::with_capacity(table.columns.len());
        let mut ambiguous = Vec::new();

        for column in &table.columns {
            let role = if column.is_primary_key() {
                ColumnRole::PrimaryKey
            } else if let Some(prefix) = referenced_prefix(&column.name) {
                match resolve_target(prefix, &known_tables) {
                    Some((key, target)) if key != own_name => {
                        analysis
                            .relationships
                            .push(Relationship::new(&table.name, target, &column.name));
                        ColumnRole::Reference {
                            target: target.to_string(),
                        }
                    }
                    // Unknown prefix, or the column names its own table
                    _ => {
                        ambiguous.push(AmbiguousColumn {
                            name: column.name.clone(),
                            column_type: column.column_type.clone(),
                        });
                        ColumnRole::Ambiguous
                    }
                }
            } else {
                ColumnRole::Plain
            };

            columns.push(AnalyzedColumn {
                column: column.clone(),
                role,
            });
        }

        analysis.tables.push(TableAnalysis {
            table: table.name.clone(),
            columns,
            ambiguous,
        });
    }

    tracing::debug!(
        tables = analysis.tables.len(),
        relationships = analysis.relationships.len(),
        ambiguous_columns = analysis.ambiguous_column_count(),
        "analyzed schema"
    );

    analysis
}
