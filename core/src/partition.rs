//! Decides which tables get DDL and which get their rows extracted.

use std::collections::HashSet;

use crate::ddl::{PartitionLevel, Table};

/// Appended to external leaf partitions, which are created standalone and
/// then exchanged into their parent.
pub const EXT_PART_SUFFIX: &str = "_ext_part_";

/// Longest relation name the engine accepts
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Largest byte index `<= limit` that falls on a char boundary.
fn floor_char_boundary(name: &str, limit: usize) -> usize {
    let mut end = limit.min(name.len());
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Suffix an external leaf name, truncating the base so the result stays
/// within [`MAX_IDENTIFIER_LEN`] (plus two for the quotes of a quoted name).
pub fn append_ext_part_suffix(name: &str) -> String {
    if let Some(inner) = name.strip_suffix('"') {
        let quoted_max = MAX_IDENTIFIER_LEN + 2;
        let keep = if name.len() + EXT_PART_SUFFIX.len() > quoted_max {
            floor_char_boundary(inner, quoted_max - EXT_PART_SUFFIX.len() - 1)
        } else {
            inner.len()
        };
        return format!("{}{EXT_PART_SUFFIX}\"", &inner[..keep]);
    }
    if name.len() + EXT_PART_SUFFIX.len() > MAX_IDENTIFIER_LEN {
        let keep = floor_char_boundary(name, MAX_IDENTIFIER_LEN - EXT_PART_SUFFIX.len());
        return format!("{}{EXT_PART_SUFFIX}", &name[..keep]);
    }
    format!("{name}{EXT_PART_SUFFIX}")
}

/// Metadata and data table lists for one backup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSplit {
    /// Tables whose CREATE statement is emitted, in input order
    pub metadata: Vec<Table>,
    /// Physical tables whose rows are extracted, in input order
    pub data: Vec<Table>,
}

/// Table selection from an include list of FQNs; an empty list selects
/// every table.
///
/// A parent is selected when any member of its hierarchy is named, and a
/// leaf or intermediate when it or its root is named.
#[derive(Clone, Debug, Default)]
pub struct TableFilter {
    include: HashSet<String>,
    included_roots: HashSet<String>,
}

impl TableFilter {
    pub fn new(tables: &[Table], include: &[String]) -> Self {
        let include: HashSet<String> = include.iter().cloned().collect();
        let included_roots = tables
            .iter()
            .filter(|t| include.contains(&t.relation.fqn()))
            .map(|t| match t.def.partition_level {
                PartitionLevel::Leaf | PartitionLevel::Intermediate => t.def.partition_root.clone(),
                _ => t.relation.fqn(),
            })
            .collect();
        Self {
            include,
            included_roots,
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.include.is_empty()
    }

    /// Whether `fqn` was named explicitly
    pub fn names(&self, fqn: &str) -> bool {
        self.include.contains(fqn)
    }

    pub fn matches(&self, table: &Table) -> bool {
        if !self.is_filtered() {
            return true;
        }
        let fqn = table.relation.fqn();
        match table.def.partition_level {
            PartitionLevel::Parent => self.included_roots.contains(&fqn),
            PartitionLevel::Leaf | PartitionLevel::Intermediate => {
                self.names(&fqn) || self.names(&table.def.partition_root)
            }
            PartitionLevel::Unpartitioned => self.names(&fqn),
        }
    }
}

/// Split `tables` by partition level.
///
/// Intermediate partitions never appear in either list. External and foreign
/// tables hold no local rows and are never data tables.
pub fn split_tables_by_partition_type(tables: &[Table], filter: &TableFilter, leaf_partition_data: bool) -> TableSplit {
    let holds_rows = |table: &Table| !table.is_external() && !table.is_foreign();

    let mut split = TableSplit::default();
    for table in tables {
        let level = table.def.partition_level;
        if !filter.matches(table) {
            continue;
        }

        if level == PartitionLevel::Leaf && table.is_external() {
            let mut renamed = table.clone();
            renamed.relation.name = append_ext_part_suffix(&table.relation.name);
            split.metadata.push(renamed);
        }
        if matches!(level, PartitionLevel::Parent | PartitionLevel::Unpartitioned) {
            split.metadata.push(table.clone());
        }

        if !holds_rows(table) {
            continue;
        }
        let is_data = if leaf_partition_data {
            matches!(level, PartitionLevel::Leaf | PartitionLevel::Unpartitioned)
        } else if filter.is_filtered() {
            level != PartitionLevel::Intermediate && filter.names(&table.relation.fqn())
        } else {
            matches!(level, PartitionLevel::Parent | PartitionLevel::Unpartitioned)
        };
        if is_data {
            split.data.push(table.clone());
        }
    }
    split
}
