//! Configuration for the gpdump CLI
//!
//! Handles loading `gpdump.toml`. Every key is optional; command-line flags
//! override whatever the file sets.
//!
//! ```toml
//! snapshot = "catalog.json"
//! out = "./backup"
//! leafPartitionData = true
//! includeTables = ["public.orders"]
//! lockBatchSize = 100
//! withStats = true
//! catalogVersion = 6
//! ```

use std::path::{Path, PathBuf};

use gpdump_core::BackupOptions;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "gpdump.toml";

/// Contents of `gpdump.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Catalog snapshot to read
    pub snapshot: Option<PathBuf>,
    /// Backup directory to write
    pub out: Option<PathBuf>,
    #[serde(flatten)]
    pub backup: BackupOptions,
}

impl Config {
    /// Load from `gpdump.toml` in the working directory, or defaults when
    /// there is none.
    pub fn load() -> Result<Self, Error> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| Error::Parse(path.into(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can use.
    pub fn validate(&self) -> Result<(), Error> {
        if self.backup.lock_batch_size == 0 {
            return Err(Error::Invalid("lockBatchSize must be at least 1".into()));
        }
        if let Some(bad) = self.backup.include_tables.iter().find(|t| !t.contains('.')) {
            return Err(Error::Invalid(format!(
                "includeTables entry '{bad}' is not schema-qualified"
            )));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file values.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(snapshot) = overrides.snapshot {
            self.snapshot = Some(snapshot);
        }
        if let Some(out) = overrides.out {
            self.out = Some(out);
        }
        if overrides.leaf_partition_data {
            self.backup.leaf_partition_data = true;
        }
        if !overrides.include_tables.is_empty() {
            self.backup.include_tables = overrides.include_tables;
        }
        if let Some(size) = overrides.lock_batch_size {
            self.backup.lock_batch_size = size;
        }
        if overrides.with_stats {
            self.backup.with_stats = true;
        }
        if overrides.without_globals {
            self.backup.without_globals = true;
        }
        if let Some(version) = overrides.catalog_version {
            self.backup.catalog_version = version;
        }
    }

    pub fn snapshot_path(&self) -> Result<&Path, Error> {
        self.snapshot.as_deref().ok_or(Error::Missing("snapshot"))
    }

    pub fn out_dir(&self) -> Result<&Path, Error> {
        self.out.as_deref().ok_or(Error::Missing("out"))
    }
}

/// Values given on the command line; unset fields keep the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub snapshot: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub leaf_partition_data: bool,
    pub include_tables: Vec<String>,
    pub lock_batch_size: Option<usize>,
    pub with_stats: bool,
    pub without_globals: bool,
    pub catalog_version: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no {0} given; pass --{0} or set it in gpdump.toml")]
    Missing(&'static str),
}

pub type ConfigError = Error;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            snapshot = "catalog.json"
            out = "./backup"
            leafPartitionData = true
            includeTables = ["public.orders"]
            lockBatchSize = 25
            catalogVersion = 7
            withoutGlobals = true
        "#,
        )
        .unwrap();
        assert_eq!(cfg.snapshot.as_deref(), Some(Path::new("catalog.json")));
        assert!(cfg.backup.leaf_partition_data);
        assert_eq!(cfg.backup.include_tables, ["public.orders"]);
        assert_eq!(cfg.backup.lock_batch_size, 25);
        assert_eq!(cfg.backup.catalog_version, 7);
        assert!(cfg.backup.without_globals);
        assert!(!cfg.backup.with_stats);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.backup.lock_batch_size, 100);
        assert!(matches!(cfg.snapshot_path(), Err(Error::Missing("snapshot"))));
    }

    #[test]
    fn flags_override_file() {
        let mut cfg: Config = toml::from_str(
            r#"
            out = "./from-file"
            includeTables = ["public.a"]
            lockBatchSize = 10
        "#,
        )
        .unwrap();
        cfg.apply(Overrides {
            out: Some("./from-flag".into()),
            include_tables: vec!["public.b".into()],
            with_stats: true,
            ..Default::default()
        });
        assert_eq!(cfg.out_dir().unwrap(), Path::new("./from-flag"));
        assert_eq!(cfg.backup.include_tables, ["public.b"]);
        assert_eq!(cfg.backup.lock_batch_size, 10);
        assert!(cfg.backup.with_stats);
    }

    #[test]
    fn rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        std::fs::write(&path, "lockBatchSize = 0").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Invalid(_))));

        std::fs::write(&path, "includeTables = [\"orders\"]").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Invalid(_))));

        std::fs::write(&path, "lockBatchSize = \"many\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Parse(..))));

        assert!(matches!(
            Config::load_from(&dir.path().join("missing.toml")),
            Err(Error::NotFound(_))
        ));
    }
}
