use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::relation::Relation;
use crate::toc::{MetadataEntry, TocObject};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Sequence {
    #[serde(flatten)]
    pub relation: Relation,
    pub last_val: i64,
    pub increment: i64,
    pub max_val: i64,
    pub min_val: i64,
    pub cache_val: i64,
    pub log_cnt: i64,
    pub is_cycled: bool,
    pub is_called: bool,
}

impl Sequence {
    /// Whether `max_val` is the bound the engine assumes when none is given:
    /// `i64::MAX` ascending, `-1` descending.
    pub const fn has_implicit_max(&self) -> bool {
        if self.increment > 0 {
            self.max_val == i64::MAX
        } else {
            self.max_val == -1
        }
    }

    /// Whether `min_val` is the implicit bound: `1` ascending, `-i64::MAX`
    /// descending (`i64::MIN` on newer generations).
    pub const fn has_implicit_min(&self) -> bool {
        if self.increment > 0 {
            self.min_val == 1
        } else {
            self.min_val == -i64::MAX || self.min_val == i64::MIN
        }
    }
}

impl TocObject for Sequence {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(
            self.relation.schema.clone(),
            self.relation.name.clone(),
            "SEQUENCE",
        )
    }

    fn fqn(&self) -> String {
        self.relation.fqn()
    }
}

/// Column that owns a sequence (`serial` columns and `OWNED BY`)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SequenceOwner {
    pub sequence_fqn: String,
    pub owning_table: String,
    /// Already qualified, e.g. `public.foo.id`
    pub owning_column: String,
}

/// Sequence FQN → owner
pub type SequenceOwnerMap = HashMap<String, SequenceOwner>;
