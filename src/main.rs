use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use entity_chart::document::ResolveMode;
use entity_chart::scene::Scene;
use entity_chart::schema;
use entity_chart::svg::SvgRenderer;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Derived schema JSON
    Schema,
    /// Rendered diagram
    Svg,
    /// Normalized diagram document
    Document,
}

/// Load an entity diagram document and derive its schema or render it
#[derive(Debug, Parser)]
#[command(name = "entity-chart", version, about)]
struct Cli {
    /// Diagram document (JSON), `-` for stdin
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Schema)]
    format: Format,

    /// Fail on dangling relation endpoints and unknown objects
    #[arg(long)]
    strict: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let input = read_input(&cli.input)?;
    let mode = if cli.strict {
        ResolveMode::Strict
    } else {
        ResolveMode::Lenient
    };
    let resolved = Scene::deserialize(&input, mode)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    if !resolved.unresolved.is_empty() {
        warn!("{} relation endpoints could not be restored", resolved.unresolved.len());
    }
    debug!("loaded {} nodes", resolved.scene.len());

    let output = match cli.format {
        Format::Schema => serde_json::to_string_pretty(&schema::derive(&resolved.scene))?,
        Format::Svg => SvgRenderer::default().render(&resolved.scene),
        Format::Document => resolved.scene.serialize()?,
    };

    match cli.output {
        Some(path) => fs::write(&path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", output),
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
