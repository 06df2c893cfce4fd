//! FairLens CLI: terminal client for the FairLens fairness service.
//!
//! Provides scripted subcommands and an interactive step-by-step wizard.

mod commands;
mod report;
mod tui;

use clap::Parser;
use fairlens_core::{FairlensError, PredictionKind};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// FairLens: detect and mitigate bias in predictive models
#[derive(Parser, Debug)]
#[command(name = "fairlens", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the fairness service
    #[arg(long)]
    api_url: Option<String>,

    /// Directory downloads and plots are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run the pipeline without the interactive wizard (requires a subcommand)
    #[arg(long)]
    no_tui: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand (starts the interactive wizard if omitted)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check that the fairness service is reachable
    Health,
    /// Write the bundled sample dataset (no network call)
    Sample,
    /// Upload a CSV dataset
    UploadData {
        /// Path to a .csv file
        path: PathBuf,
    },
    /// Save the target, protected attributes, and feature columns
    SetMetadata {
        /// Target column
        #[arg(short, long)]
        target: String,
        /// Protected attribute columns (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        protected: Vec<String>,
        /// Feature columns (comma separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        features: Vec<String>,
    },
    /// Upload a trained model (.joblib, .pkl, .pickle)
    UploadModel {
        /// Path to the model file
        path: PathBuf,
    },
    /// Analyze bias in the uploaded model's predictions
    Analyze,
    /// Apply a fairness mitigation technique
    Mitigate {
        /// Technique name (e.g. reweighing)
        #[arg(short, long)]
        technique: String,
        /// Protected attribute to mitigate on
        #[arg(short, long)]
        attribute: String,
    },
    /// Compare the original and mitigated models
    Compare,
    /// Download biased or fair predictions as CSV
    DownloadPredictions {
        /// biased or fair
        kind: PredictionKind,
    },
    /// Download the model card as JSON
    ModelCard,
    /// Run the whole pipeline end to end
    Run(RunArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Path to a .csv dataset
    #[arg(long)]
    data: PathBuf,
    /// Path to the model file
    #[arg(long)]
    model: PathBuf,
    /// Target column
    #[arg(short, long)]
    target: String,
    /// Protected attribute columns (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    protected: Vec<String>,
    /// Feature columns (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    features: Vec<String>,
    /// Mitigation technique
    #[arg(long, default_value = "reweighing")]
    technique: String,
    /// Attribute to mitigate on (defaults to the first protected attribute)
    #[arg(long)]
    attribute: Option<String>,
    /// Also download both prediction files and the model card
    #[arg(long)]
    download: bool,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let interactive = cli.command.is_none() && !cli.no_tui;

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // The wizard owns the terminal in raw mode, so stderr stays quiet there.
    let stderr_layer = (!interactive).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(EnvFilter::new(filter))
    });

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "fairlens", "fairlens")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "fairlens.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if let Some(Commands::Config { action }) = &cli.command {
        return commands::handle_config(action, &workspace, cli.config.as_deref());
    }

    // Load configuration
    if !fairlens_core::config::config_exists(Some(&workspace)) {
        tracing::debug!("No configuration file found, using defaults");
    }
    let mut config = fairlens_core::config::load_config(Some(&workspace), cli.config.as_deref())
        .map_err(FairlensError::from)?;

    // Apply CLI overrides
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(dir) = &cli.output {
        config.output.dir = dir.clone();
    }
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    match cli.command {
        Some(command) => commands::handle_command(command, config, cli.quiet).await,
        None if cli.no_tui => {
            anyhow::bail!("--no-tui needs a subcommand; see `fairlens --help`")
        }
        None => tui::run(config).await,
    }
}
