use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemaviz_catalog::{read_schema, CatalogAdapter, MySqlAdapter};
use schemaviz_core::{ConnectionConfig, ConnectionOverrides, DEFAULT_CONFIG_FILE};
use schemaviz_engine::{build_graph, SchemaGraph};
use schemaviz_render::{open_in_browser, write_output, GraphRenderer, DEFAULT_OUTPUT_FILE};

/// schemaviz - Visualize MySQL table relationships in the browser
#[derive(Parser, Debug)]
#[command(name = "schemaviz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an INI file with a [mysql] section
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// MySQL host
    #[arg(long)]
    host: Option<String>,

    /// MySQL user
    #[arg(long)]
    user: Option<String>,

    /// MySQL password
    #[arg(long)]
    password: Option<String>,

    /// Database (schema) to visualize
    #[arg(long)]
    database: Option<String>,

    /// MySQL port
    #[arg(long)]
    port: Option<u16>,

    /// Where to write the generated page
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Write the page without opening a browser
    #[arg(long)]
    no_open: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.host.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            port: self.port,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(graph) => {
            print_summary(&graph, &cli.output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: &Cli) -> Result<SchemaGraph> {
    let config = ConnectionConfig::resolve(cli.overrides(), &cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    tracing::info!("Connecting to {}", config);

    let adapter = MySqlAdapter::connect(&config)
        .await
        .context("Failed to connect to MySQL")?;
    tracing::info!(
        host = adapter.host(),
        port = adapter.port(),
        "Connected to database: {}",
        adapter.database()
    );

    let graph = visualize(&adapter, &cli.output).await?;

    if cli.no_open {
        tracing::debug!("skipping browser");
    } else if let Err(err) = open_in_browser(&cli.output) {
        tracing::warn!("{}", err);
    }

    Ok(graph)
}

/// Read the schema, close the connection, then build and write the page
///
/// The adapter is closed whether or not the read succeeded.
async fn visualize(adapter: &dyn CatalogAdapter, output: &Path) -> Result<SchemaGraph> {
    let snapshot = read_schema(adapter).await;

    if let Err(err) = adapter.close().await {
        tracing::warn!("Failed to close {} connection: {}", adapter.name(), err);
    }

    let snapshot = snapshot.context("Failed to read schema")?;
    let graph = build_graph(&snapshot);

    let html = GraphRenderer::new()?.render(&graph)?;
    write_output(output, &html)?;

    Ok(graph)
}

fn print_summary(graph: &SchemaGraph, output: &Path) {
    let ambiguous = graph.ambiguous_nodes();

    println!();
    println!("{} {}", "Tables:".bold(), graph.node_count());
    println!("{} {}", "Relationships:".bold(), graph.edge_count());

    if ambiguous.is_empty() {
        println!("{}", "✓ Every _id column resolved".green());
    } else {
        println!(
            "{} {}",
            "Tables with ambiguous columns:".bold(),
            ambiguous.len().to_string().yellow()
        );
        for node in ambiguous {
            let columns: Vec<&str> = node.ambiguous_cols.iter().map(|(name, _)| name.as_str()).collect();
            println!("  {} {}", node.id.yellow(), columns.join(", "));
        }
    }

    println!();
    println!("{} {}", "Visualization saved to:".green(), output.display());
}
