//! Options controlling one backup run.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogCapabilities;
use crate::lock::DEFAULT_LOCK_BATCH_SIZE;

/// Run-wide backup options.
///
/// Keys are camelCase in both `gpdump.toml` and JSON.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupOptions {
    /// Extract rows per leaf partition instead of through the parent
    pub leaf_partition_data: bool,
    /// Table FQNs to back up; empty means every table
    pub include_tables: Vec<String>,
    pub lock_batch_size: usize,
    /// Write `statistics.sql` alongside the metadata
    pub with_stats: bool,
    /// Leave out `global.sql` (roles, resource management, tablespaces, the
    /// database itself)
    pub without_globals: bool,
    /// Major version of the source cluster
    pub catalog_version: u32,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            leaf_partition_data: false,
            include_tables: Vec::new(),
            lock_batch_size: DEFAULT_LOCK_BATCH_SIZE,
            with_stats: false,
            without_globals: false,
            catalog_version: CatalogCapabilities::default().major_version,
        }
    }
}

impl BackupOptions {
    #[inline]
    pub const fn caps(&self) -> CatalogCapabilities {
        CatalogCapabilities::new(self.catalog_version)
    }
}
