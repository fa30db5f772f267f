//! Metadata-to-DDL reconstruction engine.
//!
//! Takes an already-fetched [`CatalogSnapshot`], assembles it into a
//! [`Catalog`] and renders dependency-ordered DDL per output section while a
//! [`Toc`] records the byte range of every emitted object.
//!
//! ```ignore
//! let catalog = Catalog::load(Path::new("snapshot.json"))?;
//! let toc = run_backup(&catalog, &BackupOptions::default(), Path::new("backup"))?;
//! ```

pub mod acl;
pub mod backup;
pub mod catalog;
pub mod config;
pub mod ddl;
pub mod emit;
pub mod error;
pub mod lock;
pub mod partition;
pub mod sink;
pub mod snapshot;
pub mod sortable;
pub mod statistics;
pub mod toc;
mod trace;
pub mod utils;

pub use acl::{Acl, Grantee, MetadataMap, ObjectMetadata, Privilege, UniqueId, parse_acl};
pub use backup::{
    BackupPlan, run_backup, write_global, write_postdata, write_predata, write_statistics,
};
pub use catalog::CatalogCapabilities;
pub use config::BackupOptions;
pub use emit::Emitter;
pub use error::{DumpError, Result};
pub use lock::{DEFAULT_LOCK_BATCH_SIZE, generate_table_batches, lock_statements};
pub use partition::{TableFilter, TableSplit, split_tables_by_partition_type};
pub use sink::ByteCountWriter;
pub use snapshot::{Catalog, CatalogSnapshot};
pub use sortable::{ObjectKind, Sortable, topological_sort};
pub use toc::{CoordinatorDataEntry, MetadataEntry, Section, Toc, TocObject};
