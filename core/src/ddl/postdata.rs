use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::make_fqn;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexDefinition {
    pub oid: u32,
    pub name: String,
    pub owning_schema: String,
    pub owning_table: String,
    pub tablespace: String,
    pub def: Option<String>,
    pub is_clustered: bool,
    /// Backing index of a constraint; created by the constraint itself
    pub supports_constraint: bool,
}

impl IndexDefinition {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_CLASS, self.oid)
    }

    pub fn owning_fqn(&self) -> String {
        make_fqn(&self.owning_schema, &self.owning_table)
    }
}

impl TocObject for IndexDefinition {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.owning_schema.clone(), self.name.clone(), "INDEX")
            .with_reference(self.owning_fqn())
    }

    fn fqn(&self) -> String {
        make_fqn(&self.owning_schema, &self.name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleDefinition {
    pub oid: u32,
    pub name: String,
    pub owning_schema: String,
    pub owning_table: String,
    pub def: Option<String>,
}

impl RuleDefinition {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_REWRITE, self.oid)
    }

    pub fn owning_fqn(&self) -> String {
        make_fqn(&self.owning_schema, &self.owning_table)
    }
}

impl TocObject for RuleDefinition {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.owning_schema.clone(), self.name.clone(), "RULE")
            .with_reference(self.owning_fqn())
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerDefinition {
    pub oid: u32,
    pub name: String,
    pub owning_schema: String,
    pub owning_table: String,
    pub def: Option<String>,
}

impl TriggerDefinition {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_TRIGGER, self.oid)
    }

    pub fn owning_fqn(&self) -> String {
        make_fqn(&self.owning_schema, &self.owning_table)
    }
}

impl TocObject for TriggerDefinition {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.owning_schema.clone(), self.name.clone(), "TRIGGER")
            .with_reference(self.owning_fqn())
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}
