//! HTML rendering for schema graphs
//!
//! This crate handles:
//! - Embedding a serialized [`schemaviz_engine::SchemaGraph`] in the visualizer template
//! - Writing the resulting page to disk
//! - Opening the page in the default browser

pub mod renderer;
pub mod output;

pub use renderer::{GraphRenderer, RenderError, TEMPLATE_NAME};
pub use output::{absolute_path, open_in_browser, write_output, DEFAULT_OUTPUT_FILE};
