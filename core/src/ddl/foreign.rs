use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};

/// Options are pre-rendered `key 'value'` lists; empty when unset.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignDataWrapper {
    pub oid: u32,
    pub name: String,
    /// Handler function oid; 0 when unset
    pub handler: u32,
    /// Validator function oid; 0 when unset
    pub validator: u32,
    pub options: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignServer {
    pub oid: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub server_type: String,
    pub version: String,
    pub foreign_data_wrapper: String,
    pub options: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserMapping {
    pub oid: u32,
    /// Mapped role, or `PUBLIC`
    pub user: String,
    pub server: String,
    pub options: String,
}

impl ForeignDataWrapper {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_FOREIGN_DATA_WRAPPER, self.oid)
    }
}

impl TocObject for ForeignDataWrapper {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "FOREIGN DATA WRAPPER")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

impl ForeignServer {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_FOREIGN_SERVER, self.oid)
    }
}

impl TocObject for ForeignServer {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "FOREIGN SERVER")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

impl TocObject for UserMapping {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.fqn(), "USER MAPPING")
    }

    fn fqn(&self) -> String {
        format!("{} ON {}", self.user, self.server)
    }
}
