//! Error types for the CLI

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot assembly, emission or TOC failure
    #[error("{0}")]
    Dump(#[from] gpdump_core::DumpError),

    /// Output directory already holds a backup
    #[error("{} already contains a backup; choose an empty directory", .0.display())]
    OutputExists(std::path::PathBuf),
}
