//! Graph assembly: tables become nodes, relationships become edges
//!
//! Edges point from the referenced table to the referencing one, so
//! `orders.customer_id` yields `customers -> orders`. The structure
//! serializes directly to the `{nodes, links}` object the visualizer reads.

use crate::inference::{analyze_schema, Relationship};
use crate::presentation::TableSummary;
use schemaviz_core::SchemaSnapshot;
use serde::{Deserialize, Serialize};

/// A table in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Table name
    pub id: String,

    /// Column summary (HTML)
    pub info: String,

    /// Whether the table has ambiguous columns
    pub ambiguous: bool,

    /// Ambiguous columns as `[name, type]` pairs
    pub ambiguous_cols: Vec<(String, String)>,

    /// Starts equal to `ambiguous`; the front end keeps it set after a
    /// node's ambiguity is resolved by hand
    pub was_ambiguous: bool,

    /// Layout position and velocity, filled in by the front end
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub vx: Option<f64>,
    pub vy: Option<f64>,
}

impl GraphNode {
    /// Node built from a table summary, with no layout yet
    pub fn from_summary(summary: &TableSummary) -> Self {
        let ambiguous = summary.is_ambiguous();
        Self {
            id: summary.table.clone(),
            info: summary.columns_html.clone(),
            ambiguous,
            ambiguous_cols: summary
                .ambiguous
                .iter()
                .map(|c| (c.name.clone(), c.column_type.clone()))
                .collect(),
            was_ambiguous: ambiguous,
            x: None,
            y: None,
            vx: None,
            vy: None,
        }
    }

    /// Node with no column information
    fn bare(id: &str) -> Self {
        Self {
            id: id.to_string(),
            info: String::new(),
            ambiguous: false,
            ambiguous_cols: Vec::new(),
            was_ambiguous: false,
            x: None,
            y: None,
            vx: None,
            vy: None,
        }
    }
}

/// A reference between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Referenced (parent) table
    pub source: String,

    /// Referencing (child) table
    pub target: String,

    /// Column in `target` that holds the reference
    pub column: String,

    /// Drawn by hand in the front end; inferred edges are never manual
    pub manual: bool,
}

impl GraphEdge {
    /// Edge for an inferred relationship, parent to child
    pub fn from_relationship(relationship: &Relationship) -> Self {
        Self {
            source: relationship.target.clone(),
            target: relationship.source.clone(),
            column: relationship.column.clone(),
            manual: false,
        }
    }
}

/// Directed graph of tables
///
/// Cycles and self-loops are allowed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

impl SchemaGraph {
    /// Build the graph from relationships and per-table summaries
    ///
    /// Nodes follow `tables` order and edges follow `relationships` order.
    /// An edge endpoint with no summary gets a bare node appended after the
    /// summarized ones.
    pub fn assemble(relationships: &[Relationship], tables: &[TableSummary]) -> Self {
        let mut graph = Self {
            nodes: tables.iter().map(GraphNode::from_summary).collect(),
            links: Vec::with_capacity(relationships.len()),
        };

        for relationship in relationships {
            let edge = GraphEdge::from_relationship(relationship);
            graph.ensure_node(&edge.source);
            graph.ensure_node(&edge.target);
            graph.links.push(edge);
        }

        graph
    }

    fn ensure_node(&mut self, id: &str) {
        if self.node(id).is_none() {
            tracing::warn!(table = id, "relationship refers to a table with no metadata");
            self.nodes.push(GraphNode::bare(id));
        }
    }

    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }

    /// Nodes flagged ambiguous, in node order
    pub fn ambiguous_nodes(&self) -> Vec<&GraphNode> {
        self.nodes.iter().filter(|n| n.ambiguous).collect()
    }

    /// Tables that reference `id` (edge targets)
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target.as_str())
            .collect()
    }

    /// Tables `id` references (edge sources)
    pub fn parents(&self, id: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|e| e.target == id)
            .map(|e| e.source.as_str())
            .collect()
    }

    /// Serialize to the JSON object embedded in the visualizer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Infer relationships for a snapshot and assemble its graph
pub fn build_graph(snapshot: &SchemaSnapshot) -> SchemaGraph {
    let analysis = analyze_schema(snapshot);
    let summaries = TableSummary::from_tables(&analysis.tables);
    SchemaGraph::assemble(&analysis.relationships, &summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::AmbiguousColumn;
    use pretty_assertions::assert_eq;
    use schemaviz_core::{Column, Table};

    fn summary(table: &str, ambiguous: &[(&str, &str)]) -> TableSummary {
        TableSummary {
            table: table.to_string(),
            columns_html: format!("{} columns", table),
            ambiguous: ambiguous
                .iter()
                .map(|(name, ty)| AmbiguousColumn {
                    name: name.to_string(),
                    column_type: ty.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn edge_points_from_parent_to_child() {
        let relationships = vec![Relationship::new("orders", "customers", "customer_id")];
        let tables = vec![summary("customers", &[]), summary("orders", &[])];

        let graph = SchemaGraph::assemble(&relationships, &tables);

        assert_eq!(
            graph.links,
            vec![GraphEdge {
                source: "customers".to_string(),
                target: "orders".to_string(),
                column: "customer_id".to_string(),
                manual: false,
            }]
        );
        assert_eq!(graph.children("customers"), vec!["orders"]);
        assert_eq!(graph.parents("orders"), vec!["customers"]);
        assert!(graph.parents("customers").is_empty());
    }

    #[test]
    fn nodes_follow_table_order_and_carry_ambiguity() {
        let tables = vec![
            summary("b", &[("note_id", "int")]),
            summary("a", &[]),
        ];

        let graph = SchemaGraph::assemble(&[], &tables);

        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let b = graph.node("b").unwrap();
        assert!(b.ambiguous);
        assert!(b.was_ambiguous);
        assert_eq!(b.ambiguous_cols, vec![("note_id".to_string(), "int".to_string())]);
        assert_eq!(b.info, "b columns");
        assert_eq!(b.x, None);
        assert_eq!(graph.ambiguous_nodes().len(), 1);
    }

    #[test]
    fn assembly_is_deterministic() {
        let relationships = vec![
            Relationship::new("a", "b", "b_id"),
            Relationship::new("b", "a", "a_id"),
        ];
        let tables = vec![summary("a", &[]), summary("b", &[])];

        let first = SchemaGraph::assemble(&relationships, &tables);
        let second = SchemaGraph::assemble(&relationships, &tables);

        assert_eq!(first, second);
        assert_eq!(first.edge_count(), 2);
    }

    #[test]
    fn tolerates_self_loops_and_unknown_tables() {
        let relationships = vec![
            Relationship::new("a", "a", "a_id"),
            Relationship::new("a", "ghost", "ghost_id"),
        ];
        let graph = SchemaGraph::assemble(&relationships, &[summary("a", &[])]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node("ghost").unwrap().info, "");
        assert_eq!(graph.children("a"), vec!["a"]);
    }

    #[test]
    fn serializes_to_visualizer_shape() {
        let relationships = vec![Relationship::new("orders", "customers", "customer_id")];
        let tables = vec![summary("customers", &[]), summary("orders", &[("note_id", "int")])];
        let graph = SchemaGraph::assemble(&relationships, &tables);

        let value: serde_json::Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "nodes": [
                    {
                        "id": "customers",
                        "info": "customers columns",
                        "ambiguous": false,
                        "ambiguousCols": [],
                        "wasAmbiguous": false,
                        "x": null, "y": null, "vx": null, "vy": null
                    },
                    {
                        "id": "orders",
                        "info": "orders columns",
                        "ambiguous": true,
                        "ambiguousCols": [["note_id", "int"]],
                        "wasAmbiguous": true,
                        "x": null, "y": null, "vx": null, "vy": null
                    }
                ],
                "links": [
                    {"source": "customers", "target": "orders", "column": "customer_id", "manual": false}
                ]
            })
        );
    }

    #[test]
    fn build_graph_end_to_end() {
        let snapshot = SchemaSnapshot::from_tables(vec![
            Table::new(
                "customers",
                vec![Column::primary("id", "int"), Column::new("name", "varchar(255)")],
            ),
            Table::new(
                "orders",
                vec![
                    Column::primary("id", "int"),
                    Column::new("customer_id", "int"),
                    Column::new("note_id", "int"),
                ],
            ),
        ]);

        let graph = build_graph(&snapshot);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.links[0].source, "customers");
        assert_eq!(graph.links[0].target, "orders");

        let orders = graph.node("orders").unwrap();
        assert!(orders.ambiguous);
        assert_eq!(orders.ambiguous_cols, vec![("note_id".to_string(), "int".to_string())]);
        assert!(!graph.node("customers").unwrap().ambiguous);
    }
}
