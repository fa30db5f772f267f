//! # gpdump
//!
//! Rebuilds Greenplum DDL from a snapshot of catalog rows: global, predata,
//! postdata and statistics SQL with a byte-range table of contents for
//! selective restore.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use gpdump::prelude::*;
//!
//! # fn main() -> gpdump::Result<()> {
//! let catalog = Catalog::load(Path::new("snapshot.json"))?;
//! let opts = BackupOptions {
//!     leaf_partition_data: true,
//!     with_stats: true,
//!     ..Default::default()
//! };
//! let toc = run_backup(&catalog, &opts, Path::new("backup"))?;
//! println!("{} predata objects", toc.entries(Section::Predata).len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature   | Default | Effect                                  |
//! |-----------|---------|-----------------------------------------|
//! | `tracing` | yes     | Per-object and per-section debug events |

pub use gpdump_core::*;

pub mod prelude {
    pub use gpdump_core::backup::{
        GLOBAL_FILE, POSTDATA_FILE, PREDATA_FILE, STATISTICS_FILE, TOC_FILE,
    };
    pub use gpdump_core::{
        BackupOptions, BackupPlan, Catalog, CatalogCapabilities, CatalogSnapshot, DumpError,
        Emitter, MetadataEntry, Section, Toc, run_backup, write_global, write_postdata,
        write_predata, write_statistics,
    };
}
