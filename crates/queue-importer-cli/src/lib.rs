//! # Queue Importer CLI
//!
//! Command-line front end for the queue importer.
//!
//! ```text
//! queue-importer [OPTIONS] <SOURCE> <DESTINATION>
//! ```
//!
//! Reads an export file and replays each record into the destination queue,
//! creating the queue first when it does not exist. A destination ending in the
//! journal marker (`;journal` by default) is delivered to the queue's journal.

pub mod settings;

use clap::Parser;
use queue_importer_core::{ImportError, ImportOptions, ImportOutcome, Importer};
use queue_runtime::{Destination, QueueError, QueueProviderFactory};
use settings::{ConfigError, ImporterConfig, LoggingConfig, ProviderKind};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// CLI Structure
// ============================================================================

/// Queue Importer - replay exported messages into a queue
#[derive(Parser, Debug)]
#[command(name = "queue-importer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Import messages from an export file into a queue")]
#[command(
    long_about = "Reads a comma-separated export file and sends each record to the destination queue, creating the queue if needed"
)]
pub struct Cli {
    /// Source file and destination queue
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Configuration file path
    #[arg(short, long, env = "QUEUE_IMPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Delivery backend
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Spool directory for the filesystem provider
    #[arg(short, long)]
    pub spool_dir: Option<PathBuf>,

    /// Log progress after this many sent records
    #[arg(long)]
    pub progress_interval: Option<usize>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,
}

impl Cli {
    /// Source and destination, when exactly two positionals were given
    pub fn invocation(&self) -> Option<(&Path, &str)> {
        match self.args.as_slice() {
            [source, destination] => Some((Path::new(source), destination.as_str())),
            _ => None,
        }
    }
}

/// Usage text printed when the positional arguments are wrong
pub const USAGE: &str = "\
Usage: queue-importer [OPTIONS] <SOURCE> <DESTINATION>

  SOURCE       export file to import (first line is a header)
  DESTINATION  queue to import into; append ;journal to target its journal

Example:
  queue-importer C:\\exports\\orders.csv \".\\private$\\orders\"

Run with --help for all options.";

// ============================================================================
// Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Provider error: {0}")]
    Provider(#[from] QueueError),

    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::Import(ImportError::SourceNotFound { .. })
            | Self::Import(ImportError::SourceUnreadable { .. }) => 2,
            Self::Import(ImportError::Provisioning { .. })
            | Self::Import(ImportError::DestinationOpen { .. }) => 3,
            Self::Provider(_) => 3,
            Self::InvalidArgument { .. } => 4,
            Self::Io(_) => 5,
        }
    }
}

// ============================================================================
// Command Execution
// ============================================================================

/// Run the importer, writing the summary to stdout
pub async fn run_cli(cli: Cli) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    execute(&cli, &mut stdout).await
}

/// Run the importer, writing user-facing output to `out`
pub async fn execute(cli: &Cli, out: &mut dyn Write) -> Result<(), CliError> {
    if cli.show_config {
        let config = resolve_configuration(cli)?;
        writeln!(out, "{}", config.to_toml()?)?;
        return Ok(());
    }

    let Some((source, destination)) = cli.invocation() else {
        writeln!(out, "{}", USAGE)?;
        return Ok(());
    };

    let config = resolve_configuration(cli)?;
    initialize_logging(&config.logging);

    let destination = Destination::with_journal_marker(destination, &config.import.journal_marker)
        .map_err(|e| CliError::InvalidArgument {
            arg: "DESTINATION".to_string(),
            message: e.to_string(),
        })?;

    let provider =
        QueueProviderFactory::create_provider(config.provider.to_provider_config()?).await?;
    info!(
        provider = %provider.provider_type(),
        source = %source.display(),
        destination = %destination,
        "Starting import"
    );

    let options = ImportOptions {
        progress_interval: config.import.progress_interval,
        default_label: config.import.default_label.clone(),
    };
    let outcome = Importer::new(provider.as_ref(), options)
        .run(source, &destination)
        .await?;

    print_summary(out, source, &destination, &outcome)?;
    Ok(())
}

/// Load, override and validate the configuration
pub fn resolve_configuration(cli: &Cli) -> Result<ImporterConfig, ConfigError> {
    let mut config = settings::load_configuration(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

/// Command-line flags take precedence over every other source
pub fn apply_cli_overrides(config: &mut ImporterConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json_logs {
        config.logging.json_format = true;
    }
    if let Some(kind) = cli.provider {
        config.provider.kind = kind;
    }
    if let Some(spool_dir) = &cli.spool_dir {
        config.provider.spool_dir = Some(spool_dir.clone());
    }
    if let Some(interval) = cli.progress_interval {
        config.import.progress_interval = interval;
    }
}

/// Report the result of a run
pub fn print_summary(
    out: &mut dyn Write,
    source: &Path,
    destination: &Destination,
    outcome: &ImportOutcome,
) -> io::Result<()> {
    let summary = match outcome {
        ImportOutcome::NothingToImport => {
            writeln!(out, "Nothing to import from {}", source.display())?;
            return Ok(());
        }
        ImportOutcome::Completed(summary) => summary,
    };

    writeln!(
        out,
        "Imported {} of {} records into {}",
        summary.imported, summary.candidates, destination
    )?;
    writeln!(out, "Errors: {}", summary.errors())?;
    for failure in &summary.failures {
        writeln!(out, "  line {}: {}", failure.line, failure.error)?;
    }

    if summary.is_clean() {
        writeln!(out, "Import completed successfully")
    } else {
        writeln!(out, "Import completed with errors")
    }
}

/// Block until the operator presses Enter
pub fn wait_for_acknowledgement() -> io::Result<()> {
    eprint!("Press Enter to exit...");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Initialize logging to stderr
///
/// `RUST_LOG` wins over the configured level. A subscriber that is already
/// installed is left in place.
pub fn initialize_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if logging.json_format {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
