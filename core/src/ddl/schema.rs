use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    pub oid: u32,
    pub name: String,
}

impl Schema {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_NAMESPACE, self.oid)
    }
}

impl TocObject for Schema {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "SCHEMA")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}
