use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use hookline::classifier::ModelRegistry;
use hookline::config::Config;
use hookline::fetch::{parse_target_url, HttpFetcher};
use hookline::output::terminal;

/// Hookline: content-based phishing detection.
///
/// Classifies web pages as phishing or legitimate from their HTML content.
#[derive(Parser)]
#[command(name = "hookline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one or more URLs and classify them
    Check {
        /// URLs to check (bare hosts get https://)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Model to classify with (default: HOOKLINE_MODEL or "heuristic")
        #[arg(long)]
        model: Option<String>,

        /// Number of pages to fetch in parallel (default: HOOKLINE_CONCURRENCY or 8)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print verdicts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a saved HTML file ("-" reads stdin)
    File {
        path: String,

        /// URL the page was served from (enables cross-domain signals)
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print the feature vector for a saved HTML file ("-" reads stdin)
    Features {
        path: String,

        /// URL the page was served from (enables cross-domain signals)
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print the feature schema as JSON (publish this with trained models)
    Schema,

    /// List available models
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hookline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            urls,
            model,
            concurrency,
            json,
        } => {
            let config = Config::load()?;
            let registry = ModelRegistry::load(&config.model_dir)?;
            let model = model.unwrap_or_else(|| config.default_model.clone());
            registry.get(&model)?;

            let targets = urls
                .iter()
                .map(|u| parse_target_url(u))
                .collect::<Result<Vec<_>, _>>()?;

            let fetcher = HttpFetcher::new(&config.fetch_options())?;
            let concurrency = concurrency.unwrap_or(config.concurrency);

            info!(count = targets.len(), model = %model, "Checking pages");

            let results = hookline::pipeline::check_many(
                &fetcher,
                &registry,
                &model,
                &targets,
                concurrency,
            )
            .await?;

            let mut failures = 0usize;
            let mut verdicts = Vec::new();
            for (url, result) in &results {
                match result {
                    Ok(verdict) => {
                        if !json {
                            terminal::display_verdict(verdict);
                        }
                        verdicts.push(verdict);
                    }
                    Err(e) => {
                        failures += 1;
                        if json {
                            eprintln!("{url}: {e:#}");
                        } else {
                            terminal::display_failure(url.as_str(), e);
                        }
                    }
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&verdicts)?);
            }

            if failures > 0 {
                anyhow::bail!("{failures} of {} checks failed", results.len());
            }
        }

        Commands::File {
            path,
            url,
            model,
            json,
        } => {
            let config = Config::load()?;
            let registry = ModelRegistry::load(&config.model_dir)?;
            let model = model.unwrap_or_else(|| config.default_model.clone());
            let page_url = url.as_deref().map(parse_target_url).transpose()?;
            let html = read_input(&path)?;

            let verdict =
                hookline::pipeline::check_document(&registry, &model, &html, page_url)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                terminal::display_verdict(&verdict);
            }
        }

        Commands::Features { path, url, json } => {
            let page_url = url.as_deref().map(parse_target_url).transpose()?;
            let html = read_input(&path)?;

            let document = hookline::document::HtmlDocument::from_bytes(&html, page_url);
            let features = hookline::features::extract(&document);

            if json {
                println!("{}", serde_json::to_string_pretty(&features)?);
            } else {
                terminal::display_features(&features);
            }
        }

        Commands::Schema => {
            let schema = hookline::features::schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }

        Commands::Models => {
            let config = Config::load()?;
            let registry = ModelRegistry::load(&config.model_dir)?;

            terminal::display_models(&registry.describe_all(), &config.default_model);
            println!(
                "\n{}",
                format!("Model directory: {}", config.model_dir.display()).dimmed()
            );
            if !registry.contains(&config.default_model) {
                println!(
                    "{} default model '{}' is not available",
                    "Warning:".yellow(),
                    config.default_model
                );
            }
        }
    }

    Ok(())
}

/// Read a saved page from a file path, or from stdin when the path is "-".
fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read HTML from stdin")?;
        return Ok(buf);
    }
    std::fs::read(Path::new(path)).with_context(|| format!("Failed to read {path}"))
}
