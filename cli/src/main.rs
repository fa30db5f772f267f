//! gpdump - Main entry point
//!
//! Turns a catalog snapshot into global, predata, postdata and statistics SQL
//! plus a byte-range table of contents.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use gpdump_cli::commands;
use gpdump_cli::config::{Config, Overrides};
use gpdump_cli::error::CliError;
use gpdump_cli::output;
use gpdump_core::Section;

/// gpdump - Metadata backup for Greenplum catalogs
#[derive(Parser, Debug)]
#[command(name = "gpdump")]
#[command(author, version, about = "Rebuild Greenplum DDL from a catalog snapshot", long_about = None)]
struct Cli {
    /// Path to config file (default: gpdump.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log each emitted object
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by commands that read a snapshot
#[derive(clap::Args, Debug, Default)]
struct SelectArgs {
    /// Catalog snapshot (JSON)
    #[arg(short, long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Back up data per leaf partition instead of per root
    #[arg(long)]
    leaf_partition_data: bool,

    /// Only back up this table (schema.name); repeatable
    #[arg(long = "include-table", value_name = "SCHEMA.TABLE")]
    include_tables: Vec<String>,

    /// Tables per LOCK TABLE statement
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(usize))]
    lock_batch_size: Option<usize>,

    /// Catalog major version (6 or 7)
    #[arg(long, value_name = "VERSION")]
    catalog_version: Option<u32>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
enum Command {
    /// Write section files and toc.json for a snapshot
    Backup {
        #[command(flatten)]
        select: SelectArgs,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Also write the statistics section
        #[arg(long)]
        with_stats: bool,

        /// Skip the global section (roles, resource queues and groups,
        /// tablespaces, the database)
        #[arg(long)]
        without_globals: bool,
    },

    /// Show table selection and lock statements without writing anything
    Plan {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// List the entries of a toc.json
    Toc {
        /// TOC file to read
        file: PathBuf,

        /// Only show one section
        #[arg(long, value_parser = parse_section)]
        section: Option<Section>,
    },
}

fn parse_section(s: &str) -> Result<Section, String> {
    Section::ALL
        .into_iter()
        .find(|section| section.as_str() == s.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown section '{s}' (global, predata, postdata, statistics)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::err_line(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gpdump_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Backup {
            select,
            out,
            with_stats,
            without_globals,
        } => {
            let config = load_config(
                cli.config.as_deref(),
                Overrides {
                    out,
                    with_stats,
                    without_globals,
                    ..overrides(select)
                },
            )?;
            commands::backup::run(&config)?;
        }
        Command::Plan { select } => {
            let config = load_config(cli.config.as_deref(), overrides(select))?;
            commands::plan::run(&config)?;
        }
        Command::Toc { file, section } => commands::toc::run(&file, section)?,
    }
    Ok(())
}

fn overrides(select: SelectArgs) -> Overrides {
    Overrides {
        snapshot: select.snapshot,
        leaf_partition_data: select.leaf_partition_data,
        include_tables: select.include_tables,
        lock_batch_size: select.lock_batch_size,
        catalog_version: select.catalog_version,
        ..Default::default()
    }
}

fn load_config(custom_path: Option<&Path>, overrides: Overrides) -> Result<Config, CliError> {
    let mut config = match custom_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply(overrides);
    config.validate()?;
    Ok(config)
}
