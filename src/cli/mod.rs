//! Command-line interface for gzsearch.
//!
//! Provides commands for serving the search API, running one-off
//! searches, inspecting load statistics, and showing configuration.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, ResolvedConfig};
use crate::core::{LoadOutcome, Loader, QueryEngine};
use crate::domain::Record;
use crate::server::{self, AppState};

/// gzsearch - substring search over a gzip-compressed JSONL catalog
#[derive(Parser, Debug)]
#[command(name = "gzsearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset path (gzip-compressed JSONL)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Skip dataset lines longer than this many bytes
    #[arg(long, global = true)]
    pub max_line_bytes: Option<NonZeroUsize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the dataset and start the HTTP server
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static files served for unmatched paths
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// JSON file returned by /autocomplete
        #[arg(long)]
        autocomplete: Option<PathBuf>,
    },

    /// Search the dataset once and print the matches
    Search {
        /// Substring to look for in title or content
        query: String,

        /// Print matches as a JSON array
        #[arg(long)]
        json: bool,

        /// Maximum number of matches to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Load the dataset and report line statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let mut settings = config::config()?.clone();
        if let Some(data) = self.data {
            settings.data = data;
        }
        if let Some(max_line_bytes) = self.max_line_bytes {
            settings.max_line_bytes = max_line_bytes;
        }

        match self.command {
            Commands::Serve {
                host,
                port,
                static_dir,
                autocomplete,
            } => {
                if let Some(host) = host {
                    settings.host = host;
                }
                if let Some(port) = port {
                    settings.port = port;
                }
                if let Some(static_dir) = static_dir {
                    settings.static_dir = static_dir;
                }
                if let Some(autocomplete) = autocomplete {
                    settings.autocomplete = autocomplete;
                }
                serve(&settings).await
            }
            Commands::Search { query, json, limit } => {
                search(&settings, &query, json, limit).await
            }
            Commands::Stats { json } => {
                show_stats(&settings, json).await
            }
            Commands::Config => {
                show_config(&settings)
            }
        }
    }
}

/// Load the configured dataset on a blocking thread
pub async fn load_dataset(settings: &ResolvedConfig) -> Result<LoadOutcome> {
    let loader = Loader::new(settings.loader_options());
    let path = settings.data.clone();

    let outcome = tokio::task::spawn_blocking(move || loader.load(&path))
        .await
        .context("Dataset load task failed")??;

    Ok(outcome)
}

/// Load the dataset, then serve HTTP until shutdown
async fn serve(settings: &ResolvedConfig) -> Result<()> {
    let outcome = load_dataset(settings)
        .await
        .context("Unable to load search data")?;

    let engine = QueryEngine::new(outcome.collection);
    let state = AppState::new(engine, settings.autocomplete.clone());
    let app = server::router(state, &settings.static_dir);

    server::serve(&settings.bind_address(), app).await
}

/// Run a single search
async fn search(
    settings: &ResolvedConfig,
    query: &str,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let outcome = load_dataset(settings).await?;
    let engine = QueryEngine::new(outcome.collection);

    let mut results = engine.search(query);
    let total = results.len();
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    if json {
        println!("{}", render_json(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", total, query);
    println!("{:<12} {:<26} {:<50}", "ID", "UPDATED", "TITLE");
    println!("{}", "-".repeat(88));

    for record in &results {
        println!(
            "{:<12} {:<26} {:<50}",
            record.id,
            format_updated_at(record),
            truncate(&record.title, 50)
        );
    }

    if results.len() < total {
        println!("\n({} more not shown)", total - results.len());
    }

    Ok(())
}

/// Report line statistics for the dataset
async fn show_stats(settings: &ResolvedConfig, json: bool) -> Result<()> {
    let outcome = load_dataset(settings).await?;
    let stats = outcome.stats;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Dataset:   {}", settings.data.display());
    println!("Lines:     {}", stats.lines);
    println!("Loaded:    {}", stats.loaded);
    println!("Malformed: {}", stats.malformed);
    println!("Oversized: {}", stats.oversized);

    Ok(())
}

fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("gzsearch configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Dataset:      {}", cfg.data.display());
    println!("  Static files: {}", cfg.static_dir.display());
    println!("  Autocomplete: {}", cfg.autocomplete.display());
    println!();
    println!("Server:");
    println!("  Bind:         {}", cfg.bind_address());
    println!();
    println!("Loader:");
    println!("  Max line:     {} bytes", cfg.max_line_bytes);

    Ok(())
}

/// Matches as one JSON array, the same shape `/search` returns
fn render_json(results: &[&Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

fn format_updated_at(record: &Record) -> String {
    record
        .updated_at_utc()
        .map(|ts| ts.to_rfc3339())
        .unwrap_or_else(|| record.updated_at.to_string())
}

/// Truncate to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
