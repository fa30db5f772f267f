use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Extension {
    pub oid: u32,
    pub name: String,
    pub schema: String,
}

impl Extension {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_EXTENSION, self.oid)
    }
}

impl TocObject for Extension {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "EXTENSION")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

/// `pg_language` row for a user-installed procedural language. Handler,
/// inline and validator are function oids; 0 when unset.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProceduralLanguage {
    pub oid: u32,
    pub name: String,
    pub owner: String,
    pub pl_trusted: bool,
    pub handler: u32,
    pub inline: u32,
    pub validator: u32,
}

impl ProceduralLanguage {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_LANGUAGE, self.oid)
    }

    /// Oids of the support functions that are set
    pub fn support_functions(&self) -> impl Iterator<Item = u32> {
        [self.handler, self.inline, self.validator]
            .into_iter()
            .filter(|&oid| oid != 0)
    }
}

impl TocObject for ProceduralLanguage {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "PROCEDURAL LANGUAGE")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }

    fn metadata_type(&self) -> String {
        "LANGUAGE".to_string()
    }
}
