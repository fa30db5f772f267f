use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraint {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    /// `u`nique, `p`rimary key, `f`oreign key, `c`heck, e`x`clusion
    pub con_type: String,
    pub def: Option<String>,
    /// FQN of the owning table or domain
    pub owning_object: String,
    pub is_domain_constraint: bool,
    pub is_partition_parent: bool,
}

impl Constraint {
    pub fn is_foreign_key(&self) -> bool {
        self.con_type == "f"
    }

    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_CONSTRAINT, self.oid)
    }
}

impl TocObject for Constraint {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.schema.clone(), self.name.clone(), "CONSTRAINT")
            .with_reference(self.owning_object.clone())
    }

    /// Constraint names are only unique per table, so DDL refers to them bare
    /// and adds `ON <table>` where needed.
    fn fqn(&self) -> String {
        self.name.clone()
    }
}
