//! Visualizer template rendering
//!
//! The template is static apart from one value, `graph_data`: the graph
//! serialized as JSON and made safe to sit inside a `<script>` element.

use minijinja::{context, Environment, Error as JinjaError};
use schemaviz_engine::SchemaGraph;
use std::path::PathBuf;

/// Name the built-in template is registered under
pub const TEMPLATE_NAME: &str = "schema_visualizer.html";

const TEMPLATE_SOURCE: &str = include_str!("../templates/schema_visualizer.html");

/// Error while producing or delivering the HTML page
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] JinjaError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open browser for {path}: {message}")]
    Browser { path: PathBuf, message: String },
}

/// Renders schema graphs into the visualizer page
pub struct GraphRenderer {
    env: Environment<'static>,
}

impl GraphRenderer {
    /// Create a renderer using the built-in template
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template(TEMPLATE_SOURCE)
    }

    /// Create a renderer from custom template source
    ///
    /// The template sees a single variable, `graph_data`.
    pub fn with_template(source: &'static str) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, source)?;
        Ok(Self { env })
    }

    /// Render the page for `graph`
    pub fn render(&self, graph: &SchemaGraph) -> Result<String, RenderError> {
        let graph_data = script_safe_json(&graph.to_json()?);
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let html = template.render(context! { graph_data => graph_data })?;

        tracing::debug!(
            nodes = graph.node_count(),
            links = graph.edge_count(),
            bytes = html.len(),
            "rendered visualizer"
        );

        Ok(html)
    }
}

/// Escape characters that could end a `<script>` element early
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\uXXXX`
/// forms decode to the same text.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_script_breakers() {
        let escaped = script_safe_json(r#"{"info":"</script><b>a&b</b>"}"#);
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));

        let value: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(value["info"], "</script><b>a&b</b>");
    }

    #[test]
    fn custom_template_receives_graph_data() {
        let renderer = GraphRenderer::with_template("DATA={{ graph_data|safe }}").unwrap();
        let html = renderer.render(&SchemaGraph::default()).unwrap();
        assert_eq!(html, r#"DATA={"nodes":[],"links":[]}"#);
    }

    #[test]
    fn invalid_template_is_rejected() {
        assert!(matches!(
            GraphRenderer::with_template("{% if %}"),
            Err(RenderError::Template(_))
        ));
    }
}
