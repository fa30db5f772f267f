//! Error types for the reconstruction engine.
//!
//! Every variant here is fatal: the backup run aborts and nothing is retried
//! or rolled back locally.

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Errors raised while assembling the entity model or emitting DDL
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// A raw `grantee=privs/grantor` string did not parse
    #[error("Malformed ACL string: {0:?}")]
    MalformedAcl(String),

    /// A single-row catalog helper received the wrong number of rows
    #[error("Expected at most one row for {context}, got {count}")]
    UnexpectedRowCount { context: String, count: usize },

    /// An orderable object carried a kind tag with no emitter
    #[error("Unknown object kind: {0}")]
    UnknownObjectKind(String),

    /// An external table location used a scheme outside the known protocols
    #[error("Unrecognized external protocol in location {0:?}")]
    UnrecognizedExternalProtocol(String),

    /// An external table had neither a location nor a command
    #[error("External table has neither a location nor a command")]
    MissingExternalSource,

    /// An EXECUTE location token outside the documented set
    #[error("Invalid execute location {0:?}")]
    InvalidExecLocation(String),

    /// A collation provider code outside c/i/d
    #[error("Invalid collation provider {provider:?} for collation {collation}")]
    InvalidCollationProvider { collation: String, provider: String },

    /// A table classified as both external and foreign
    #[error("Table {0} is both external and foreign")]
    ConflictingTableKind(String),

    /// An object referenced a function oid the snapshot has no row for
    #[error("No function with oid {0} in the snapshot")]
    MissingFunction(u32),

    /// The dependency graph contains a cycle
    #[error("Dependency sort failed: {0} object(s) could not be ordered")]
    DependencySort(usize),

    /// A built-in pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Output sink failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot or TOC (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
