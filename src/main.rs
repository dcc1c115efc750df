//! Kaula - Main entrypoint.
//!
//! Loads configuration, initializes logging and runs the requested command
//! against an associative table.

use clap::{Parser, Subcommand};
use kaula_lib::config::{self, ConfigLoader, KaulaConfig, LogConfig};
use kaula_lib::config::table::TableConfig;
use kaula_lib::data_structures::{AssociativeTable, AssociativeTableError};
use kaula_lib::error::{
    report_error, set_error_reporter, ErrorContext, KaulaError, KaulaResult, TracingErrorReporter,
};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Kaula.
#[derive(Parser, Debug)]
#[clap(name = "kaula", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Fill a table, optionally remove keys, and print a snapshot of its contents
    Demo {
        /// Entry to insert, as key=value (repeatable)
        #[clap(short, long = "pair", value_parser = parse_pair)]
        pairs: Vec<(String, String)>,

        /// Key to remove after inserting (repeatable)
        #[clap(short, long)]
        remove: Vec<String>,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> KaulaResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(log.source_location)
        .with_file(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    };

    result.map_err(|e| KaulaError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Load the configuration, falling back to default logging so the failure is visible.
fn load_or_exit(loader: &ConfigLoader) -> KaulaConfig {
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&LogConfig::default());
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

/// Load the configuration and publish it as the global configuration.
///
/// An explicit `--config` file is loaded directly. Without one, library
/// initialization reads `config/default.toml` with environment overrides.
fn init_config(path: Option<&Path>) -> KaulaConfig {
    match path {
        Some(path) => {
            let loader = ConfigLoader::new(Some(path), config::ENV_PREFIX);
            config::init_global_config(load_or_exit(&loader));
        }
        None => {
            if let Err(e) = kaula_lib::init() {
                let _ = init_logging(&LogConfig::default());
                tracing::error!("Initialization error: {}", e);
                process::exit(1);
            }
        }
    }

    config::get_global_config()
        .map(|global| global.get().clone())
        .unwrap_or_default()
}

fn run_demo(pairs: Vec<(String, String)>, removals: Vec<String>) -> KaulaResult<()> {
    let pairs = if pairs.is_empty() {
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("c".to_string(), "3".to_string()),
        ]
    } else {
        pairs
    };

    let table_config: TableConfig = config::get_global_config()
        .map(|global| global.get().table.clone())
        .unwrap_or_default();
    info!(
        table_length = table_config.table_length,
        "Running associative table demo"
    );

    let mut table: AssociativeTable<String> = AssociativeTable::with_config((&table_config).into());

    for (key, value) in pairs {
        if let Err(e) = table.put(key.clone(), value) {
            report_error(ErrorContext::new(e.into(), "demo").with_details(format!("put `{key}`")));
        }
    }

    for key in removals {
        match table.remove(key.as_str()) {
            Ok(value) => info!(key = %key, value = %value, "Removed entry"),
            Err(e) => report_error(
                ErrorContext::new(e.into(), "demo").with_details(format!("remove `{key}`")),
            ),
        }
    }

    println!(
        "entries: {}, buckets: {}, load factor: {:.2}",
        table.len(),
        table.table_length(),
        table.load_factor()
    );
    println!("chain lengths: {:?}", table.chain_lengths());

    match table.begin() {
        Ok(snapshot) => {
            for (key, value) in snapshot {
                println!("  [{}] {key} = {value}", table.bucket_index(key.as_str()));
            }
            Ok(())
        }
        Err(AssociativeTableError::EmptyTable) => {
            println!("  (empty)");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Main entry point for the application.
fn main() -> KaulaResult<()> {
    let args = <Args as clap::Parser>::parse();

    match args.command.unwrap_or(Command::Demo {
        pairs: Vec::new(),
        remove: Vec::new(),
    }) {
        Command::Demo { pairs, remove } => {
            let config = init_config(args.config.as_deref());
            init_logging(&config.log)?;
            set_error_reporter(Arc::new(TracingErrorReporter));

            run_demo(pairs, remove)
        }
        Command::Validate => {
            let config = init_config(args.config.as_deref());
            init_logging(&config.log)?;
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            init_logging(&LogConfig::default())?;
            info!("Generating default configuration");
            let default_config = KaulaConfig::default();

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = toml::to_string_pretty(&default_config)?;
            std::fs::write(&output, toml)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
