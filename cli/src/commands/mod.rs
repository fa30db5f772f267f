//! CLI command implementations
//!
//! Each command module implements one gpdump subcommand.

pub mod backup;
pub mod plan;
pub mod toc;
