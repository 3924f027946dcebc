//! sqlport CLI
//!
//! Command-line front end for converting schemas, inspecting tables,
//! transpiling procedure signatures and diffing table sets.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sqlport_core::prelude::*;
use sqlport_core::parse_create_table_with_dialect;

/// SQL dialect transpiler.
#[derive(Parser)]
#[command(name = "sqlport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON conversion config (dialects, renames, strict mode).
    #[arg(short, long, env = "SQLPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a SQL script to the target dialect.
    Convert {
        /// SQL file to convert.
        file: PathBuf,

        /// Source dialect (overrides the config).
        #[arg(long)]
        from: Option<Dialect>,

        /// Target dialect (overrides the config).
        #[arg(long)]
        to: Option<Dialect>,

        /// Fail on column types with no mapping.
        #[arg(long)]
        strict: bool,

        /// Print the full conversion result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the tables declared in a DDL file as JSON.
    Parse {
        /// SQL file to parse.
        file: PathBuf,

        /// Dialect the file is written in (defaults to the config source).
        #[arg(long)]
        dialect: Option<Dialect>,
    },

    /// Generate a Python method stub from a stored procedure.
    Procedure {
        /// File containing a `CREATE PROCEDURE` statement.
        file: PathBuf,
    },

    /// Generate a migration between two DDL files.
    Diff {
        /// Current schema.
        from: PathBuf,

        /// Desired schema.
        to: PathBuf,

        /// Dialect both files are written in (defaults to the config source).
        #[arg(long)]
        dialect: Option<Dialect>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => {
            let json = read(path)?;
            ConversionConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ConversionConfig::default(),
    };
    debug!(source = %config.source, target = %config.target, "loaded config");

    match cli.command {
        Commands::Convert {
            file,
            from,
            to,
            strict,
            json,
        } => {
            if let Some(source) = from {
                config.source = source;
            }
            if let Some(target) = to {
                config.target = target;
            }
            config.strict |= strict;

            let sql = read(&file)?;
            let result = SchemaConverter::new(config.options()).convert(
                &sql,
                &config.tables,
                &config.columns,
                config.pair(),
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.converted_sql);
            }
            for label in &result.tables_converted {
                info!("Renamed {label}");
            }
            if !result.success {
                return Err(TranspileError::Conversion(result.errors).into());
            }
            info!(
                "Converted {} ({}, {} warnings)",
                file.display(),
                config.pair(),
                result.warnings.len()
            );
        }

        Commands::Parse { file, dialect } => {
            let sql = read(&file)?;
            let tables = parse_create_table_with_dialect(&sql, dialect.unwrap_or(config.source));
            if tables.is_empty() {
                warn!("No CREATE TABLE statement found in {}", file.display());
            }
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }

        Commands::Procedure { file } => {
            let sql = read(&file)?;
            let stub = convert_to_python(&sql, &config.entities)?;
            println!("{stub}");
        }

        Commands::Diff { from, to, dialect } => {
            let dialect = dialect.unwrap_or(config.source);
            let from_tables = parse_create_table_with_dialect(&read(&from)?, dialect);
            let to_tables = parse_create_table_with_dialect(&read(&to)?, dialect);
            info!(
                "Comparing {} tables with {} tables",
                from_tables.len(),
                to_tables.len()
            );
            print!("{}", generate_migration(&from_tables, &to_tables));
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
