use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::make_fqn;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct View {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    /// Contents of the `WITH (...)` clause
    pub options: String,
    /// Null on some catalog generations when the view is mid-change
    pub definition: Option<String>,
    pub tablespace: String,
    pub is_materialized: bool,
    pub dist_policy: String,
}

impl View {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_CLASS, self.oid)
    }

    pub fn object_type(&self) -> &'static str {
        if self.is_materialized {
            "MATERIALIZED VIEW"
        } else {
            "VIEW"
        }
    }
}

impl TocObject for View {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.schema.clone(), self.name.clone(), self.object_type())
    }

    fn fqn(&self) -> String {
        make_fqn(&self.schema, &self.name)
    }
}
