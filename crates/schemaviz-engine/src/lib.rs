//! schemaviz engine - relationship inference and graph assembly
//!
//! This crate turns a [`schemaviz_core::SchemaSnapshot`] into a graph:
//! - Relationship inference from `<table>_id` column names
//! - Presentation of per-table column summaries
//! - Graph assembly (tables as nodes, references as edges)

pub mod inference;
pub mod presentation;
pub mod graph;

pub use inference::{
    analyze_schema, referenced_prefix, AmbiguousColumn, AnalyzedColumn, ColumnRole, Relationship, SchemaAnalysis, TableAnalysis,
};
pub use presentation::TableSummary;
pub use graph::{build_graph, GraphEdge, GraphNode, SchemaGraph};
