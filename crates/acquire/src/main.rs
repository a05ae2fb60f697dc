//! Acquire command-line loader

use acquire::{
    Acquire, Batch, LoaderConfig, PrefetchScriptExecutor, ReqwestFetcher, StyleSheetList,
    Transports,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Config file picked up from the working directory
const DEFAULT_CONFIG_FILE: &str = "acquire.toml";

#[derive(Parser)]
#[command(name = "acquire")]
#[command(about = "Resolve, fetch and cache resources", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./acquire.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL relative addresses are fetched from
    #[arg(short, long, global = true)]
    base_url: Option<Url>,

    /// Log loader activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the address each specifier resolves to
    Resolve {
        /// Specifiers to resolve
        #[arg(required = true)]
        specifiers: Vec<String>,
    },
    /// Load specifiers in order and print one JSON line per entry
    Fetch {
        /// Specifiers to load
        #[arg(required = true)]
        specifiers: Vec<String>,
        /// JSON object of address → content written to the cache first
        #[arg(long)]
        preload: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { specifiers } => {
            let acquire = Acquire::new(config, Transports::new());
            for specifier in &specifiers {
                match acquire.resolve(specifier) {
                    Ok(address) => println!("{}", address),
                    Err(e) => eprintln!("{}: {}", specifier, e),
                }
            }
        }
        Commands::Fetch {
            specifiers,
            preload,
        } => {
            let http = Arc::new(ReqwestFetcher::new(cli.base_url)?);
            let styles = Arc::new(StyleSheetList::new());
            let transports = Transports::new()
                .with_scripts(Arc::new(PrefetchScriptExecutor::new(http.clone())))
                .with_styles(styles.clone())
                .with_http(http);
            let acquire = Acquire::new(config, transports);

            if let Some(path) = preload {
                let batch = read_preload(&path)?;
                acquire.load(batch).await;
            }

            let results = acquire.load(Batch::specifiers(specifiers.clone())).await;
            let mut failed = false;
            for (specifier, result) in specifiers.iter().zip(results) {
                let address = acquire.resolve(specifier).ok();
                let kind = address
                    .as_ref()
                    .map(|a| acquire.loader().kind_of(a).to_string());
                let line = match result {
                    Ok(value) => json!({
                        "specifier": specifier,
                        "address": address.map(|a| a.into_string()),
                        "kind": kind,
                        "value": value.map(|v| v.to_json()),
                    }),
                    Err(e) => {
                        failed = true;
                        json!({
                            "specifier": specifier,
                            "address": address.map(|a| a.into_string()),
                            "kind": kind,
                            "error": e.to_string(),
                        })
                    }
                };
                println!("{}", line);
            }

            for sheet in styles.sheets() {
                println!("{}", json!({ "stylesheet": sheet.as_str() }));
            }

            if failed {
                std::process::exit(1);
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LoaderConfig> {
    match path {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                LoaderConfig::from_file(default)
                    .with_context(|| format!("loading config {}", default.display()))
            } else {
                Ok(LoaderConfig::default())
            }
        }
    }
}

fn read_preload(path: &Path) -> anyhow::Result<Batch> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading preload file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing preload file {}", path.display()))?;
    anyhow::ensure!(
        value.is_object(),
        "preload file {} must contain a JSON object",
        path.display()
    );
    Ok(Batch::from(value))
}
