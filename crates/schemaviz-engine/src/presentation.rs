//! Display strings for graph nodes
//!
//! Inference works on raw facts; this module is the only place that knows
//! how a table is shown in the visualizer tooltip.

use crate::inference::{AmbiguousColumn, ColumnRole, TableAnalysis};

/// Separator between rendered columns
const COLUMN_SEPARATOR: &str = "<br>";

/// Per-table data a graph node is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Table name, original casing
    pub table: String,

    /// HTML column list shown in the node tooltip
    pub columns_html: String,

    /// Ambiguous columns in ordinal order
    pub ambiguous: Vec<AmbiguousColumn>,
}

impl TableSummary {
    /// Render one table's analysis
    ///
    /// Each column reads `name (type)`. Primary keys are bold and ambiguous
    /// columns are highlighted.
    pub fn from_analysis(analysis: &TableAnalysis) -> Self {
        let columns_html = analysis
            .columns
            .iter()
            .map(|c| {
                let snippet = escape_html(&format!("{} ({})", c.column.name, c.column.column_type));
                match c.role {
                    ColumnRole::PrimaryKey => format!("<strong>{}</strong>", snippet),
                    ColumnRole::Ambiguous => {
                        format!("<span style='background-color:yellow'>{}</span>", snippet)
                    }
                    ColumnRole::Reference { .. } | ColumnRole::Plain => snippet,
                }
            })
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR);

        Self {
            table: analysis.table.clone(),
            columns_html,
            ambiguous: analysis.ambiguous.clone(),
        }
    }

    /// Render every table of an analysis, in order
    pub fn from_tables(tables: &[TableAnalysis]) -> Vec<Self> {
        tables.iter().map(Self::from_analysis).collect()
    }

    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous.is_empty()
    }
}

/// Escape text for inclusion in HTML
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
