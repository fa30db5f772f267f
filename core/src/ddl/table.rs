use serde::{Deserialize, Serialize};

use super::external::ExternalTableDefinition;
use super::relation::Relation;
use crate::acl::{Acl, UniqueId};
use crate::error::{DumpError, Result};
use crate::toc::{MetadataEntry, TocObject};

/// Fallback distribution clause for tables with no policy row.
pub const DEFAULT_DIST_POLICY: &str = "DISTRIBUTED RANDOMLY";

// =============================================================================
// Partitioning
// =============================================================================

/// Position of a table in a partition hierarchy
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PartitionLevel {
    #[serde(rename = "p")]
    Parent,
    #[serde(rename = "i")]
    Intermediate,
    #[serde(rename = "l")]
    Leaf,
    #[default]
    #[serde(rename = "n")]
    Unpartitioned,
}

impl PartitionLevel {
    pub const fn code(&self) -> char {
        match self {
            PartitionLevel::Parent => 'p',
            PartitionLevel::Intermediate => 'i',
            PartitionLevel::Leaf => 'l',
            PartitionLevel::Unpartitioned => 'n',
        }
    }
}

/// An external leaf partition that must be created standalone and swapped
/// into its parent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalPartition {
    /// Oid of the external leaf table
    pub oid: u32,
    pub parent_schema: String,
    pub parent_name: String,
    /// Named partition to exchange; empty means exchange by rank
    pub partition_name: String,
    pub rank: i32,
}

// =============================================================================
// Columns
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnDefinition {
    /// Attribute number; strictly increasing, gaps left by dropped columns
    pub num: i32,
    pub name: String,
    pub not_null: bool,
    pub has_default: bool,
    pub is_dropped: bool,
    #[serde(rename = "type")]
    pub type_name: String,
    pub encoding: String,
    /// `-1` means the default statistics target
    pub stat_target: i32,
    pub storage_type: String,
    pub default_val: String,
    pub comment: String,
    pub options: String,
    pub fdw_options: String,
    pub collation: String,
    pub security_label_provider: String,
    pub security_label: String,
    /// Resolved from the column privileges rows, not the column row itself
    #[serde(skip)]
    pub privileges: Option<Vec<Acl>>,
}

impl Default for ColumnDefinition {
    fn default() -> Self {
        Self {
            num: 0,
            name: String::new(),
            not_null: false,
            has_default: false,
            is_dropped: false,
            type_name: String::new(),
            encoding: String::new(),
            stat_target: -1,
            storage_type: String::new(),
            default_val: String::new(),
            comment: String::new(),
            options: String::new(),
            fdw_options: String::new(),
            collation: String::new(),
            security_label_provider: String::new(),
            security_label: String::new(),
            privileges: None,
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignTableDefinition {
    pub oid: u32,
    pub options: String,
    pub server: String,
}

/// Everything needed to recreate a table beyond its identity.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TableDefinition {
    pub dist_policy: String,
    pub part_def: String,
    pub part_template_def: String,
    pub storage_opts: String,
    pub tablespace_name: String,
    pub column_defs: Vec<ColumnDefinition>,
    pub ext_table_def: Option<ExternalTableDefinition>,
    pub partition_level: PartitionLevel,
    /// FQN of the partition root for leaves and intermediates
    pub partition_root: String,
    /// Composite type name for `CREATE TABLE ... OF type`
    pub table_type: String,
    pub is_unlogged: bool,
    pub foreign_def: Option<ForeignTableDefinition>,
    pub inherits: Vec<String>,
    /// `d`efault, `n`othing, `f`ull or `i`ndex
    pub replica_identity: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    #[serde(flatten)]
    pub relation: Relation,
    #[serde(flatten)]
    pub def: TableDefinition,
}

impl Table {
    pub fn new(relation: Relation, def: TableDefinition) -> Self {
        Self { relation, def }
    }

    pub fn oid(&self) -> u32 {
        self.relation.oid
    }

    pub fn unique_id(&self) -> UniqueId {
        self.relation.unique_id()
    }

    pub fn is_external(&self) -> bool {
        self.def.ext_table_def.is_some()
    }

    pub fn is_foreign(&self) -> bool {
        self.def.foreign_def.is_some()
    }

    /// Reject tables the catalog classified as both external and foreign.
    pub fn validate(&self) -> Result<()> {
        if self.is_external() && self.is_foreign() {
            return Err(DumpError::ConflictingTableKind(self.relation.fqn()));
        }
        Ok(())
    }

    /// Distribution clause, falling back to random distribution when the
    /// catalog had no policy row for this table.
    pub fn dist_policy(&self) -> &str {
        if self.def.dist_policy.is_empty() {
            DEFAULT_DIST_POLICY
        } else {
            &self.def.dist_policy
        }
    }

    /// Columns that appear in DDL; dropped columns keep their ordinal but are
    /// never emitted.
    pub fn live_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.def.column_defs.iter().filter(|c| !c.is_dropped)
    }

    /// `(a,b,c)` column list for the bulk data extract
    pub fn attribute_string(&self) -> String {
        let names: Vec<&str> = self.live_columns().map(|c| c.name.as_str()).collect();
        format!("({})", names.join(","))
    }
}

impl TocObject for Table {
    fn metadata_entry(&self) -> MetadataEntry {
        let object_type = if self.is_foreign() { "FOREIGN TABLE" } else { "TABLE" };
        MetadataEntry::new(
            self.relation.schema.clone(),
            self.relation.name.clone(),
            object_type,
        )
    }

    fn fqn(&self) -> String {
        self.relation.fqn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_level_serde_codes() {
        let level: PartitionLevel = serde_json::from_str("\"l\"").unwrap();
        assert_eq!(level, PartitionLevel::Leaf);
        assert_eq!(serde_json::to_string(&PartitionLevel::Parent).unwrap(), "\"p\"");
        assert_eq!(PartitionLevel::default().code(), 'n');
    }

    #[test]
    fn test_table_deserializes_flattened() {
        let json = r#"{
            "schemaOid": 2200,
            "oid": 16384,
            "schema": "public",
            "name": "foo",
            "distPolicy": "DISTRIBUTED BY (a)",
            "partitionLevel": "p",
            "columnDefs": [
                {"num": 1, "name": "a", "type": "integer"},
                {"num": 2, "name": "b", "type": "text", "isDropped": true},
                {"num": 3, "name": "c", "type": "text", "statTarget": 100}
            ]
        }"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert_eq!(table.relation.fqn(), "public.foo");
        assert_eq!(table.def.partition_level, PartitionLevel::Parent);
        assert_eq!(table.def.column_defs[0].stat_target, -1);
        assert_eq!(table.def.column_defs[2].stat_target, 100);
        assert_eq!(table.attribute_string(), "(a,c)");
    }

    #[test]
    fn test_conflicting_table_kind() {
        let table = Table {
            relation: Relation::new(2200, 1, "public", "t"),
            def: TableDefinition {
                ext_table_def: Some(ExternalTableDefinition::default()),
                foreign_def: Some(ForeignTableDefinition::default()),
                ..Default::default()
            },
        };
        assert!(matches!(table.validate(), Err(DumpError::ConflictingTableKind(_))));
    }

    #[test]
    fn test_dist_policy_fallback() {
        let table = Table::default();
        assert_eq!(table.dist_policy(), DEFAULT_DIST_POLICY);
    }
}
