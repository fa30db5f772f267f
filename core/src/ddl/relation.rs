use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::utils::make_fqn;

/// Identity of a `pg_class` row.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Relation {
    pub schema_oid: u32,
    pub oid: u32,
    pub schema: String,
    pub name: String,
}

impl Relation {
    pub fn new(schema_oid: u32, oid: u32, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema_oid,
            oid,
            schema: schema.into(),
            name: name.into(),
        }
    }

    pub fn fqn(&self) -> String {
        make_fqn(&self.schema, &self.name)
    }

    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_CLASS, self.oid)
    }
}

/// Two relations are the same object when oid and name match; schema fields
/// are informational.
impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.oid == other.oid && self.name == other.name
    }
}

impl Eq for Relation {}
