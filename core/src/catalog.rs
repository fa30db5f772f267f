//! Catalog capabilities threaded explicitly through every emitter that
//! depends on the catalog generation.

use serde::{Deserialize, Serialize};

use crate::error::{DumpError, Result};

/// Immutable description of the source catalog generation.
///
/// Emitters never consult process state to decide syntax; they take one of
/// these instead.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCapabilities {
    /// Major version of the source cluster (4, 5, 6, 7, ...)
    pub major_version: u32,
}

impl Default for CatalogCapabilities {
    fn default() -> Self {
        Self { major_version: 6 }
    }
}

impl CatalogCapabilities {
    pub const fn new(major_version: u32) -> Self {
        Self { major_version }
    }

    /// Number of histogram/MCV slots in `pg_statistic`.
    pub const fn statistic_slots(&self) -> usize {
        if self.major_version < 6 { 4 } else { 5 }
    }

    /// Whether `pg_statistic` carries `stainherit`.
    pub const fn has_stat_inherit(&self) -> bool {
        self.major_version >= 6
    }

    /// Whether `pg_statistic` carries per-slot `stacollN` columns.
    pub const fn has_stat_collations(&self) -> bool {
        self.major_version >= 7
    }

    /// Older generations reject `ALTER SEQUENCE/VIEW ... OWNER TO` and need
    /// `ALTER TABLE` instead.
    pub const fn owner_uses_table_keyword(&self) -> bool {
        self.major_version < 6
    }

    /// Aggregate combine functions are spelled `PREFUNC` before 6
    pub const fn aggregate_combine_keyword(&self) -> &'static str {
        if self.major_version < 6 { "PREFUNC" } else { "COMBINEFUNC" }
    }

    /// Tablespaces live in filespaces before 6
    pub const fn has_filespaces(&self) -> bool {
        self.major_version < 6
    }

    /// Whether `LOG ERRORS PERSISTENTLY` is understood.
    pub const fn supports_persistent_error_log(&self) -> bool {
        self.major_version >= 6
    }
}

/// Take the only row of a result set that must have zero or one rows.
///
/// More than one row aborts the run.
pub fn single_row<T>(context: &str, rows: Vec<T>) -> Result<Option<T>> {
    if rows.len() > 1 {
        return Err(DumpError::UnexpectedRowCount {
            context: context.to_string(),
            count: rows.len(),
        });
    }
    Ok(rows.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_slots_by_generation() {
        assert_eq!(CatalogCapabilities::new(5).statistic_slots(), 4);
        assert_eq!(CatalogCapabilities::new(6).statistic_slots(), 5);
        assert_eq!(CatalogCapabilities::new(7).statistic_slots(), 5);
        assert!(!CatalogCapabilities::new(5).has_stat_inherit());
    }

    #[test]
    fn test_single_row() {
        assert_eq!(single_row::<i32>("none", vec![]).unwrap(), None);
        assert_eq!(single_row("one", vec![7]).unwrap(), Some(7));
        let err = single_row("many", vec![1, 2]).unwrap_err();
        assert!(matches!(err, DumpError::UnexpectedRowCount { count: 2, .. }));
    }
}
