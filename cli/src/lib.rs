//! gpdump CLI - command-line driver for the reconstruction engine
//!
//! Reads a catalog snapshot (JSON rows already fetched from the cluster) and
//! writes the DDL sections plus `toc.json`, with options read from a
//! `gpdump.toml` file and overridden by flags.
//!
//! # Commands
//!
//! - `gpdump backup` - Write predata/postdata/statistics SQL and the TOC
//! - `gpdump plan` - Show the metadata list, data list and lock statements
//! - `gpdump toc <file>` - List the entries of a written TOC

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use config::{CONFIG_FILE, Config, ConfigError, Overrides};
pub use error::CliError;
