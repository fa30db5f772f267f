use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::make_fqn;

/// `pg_operator` row. Argument types are `-` (or empty) for a prefix or
/// postfix operator's missing side.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Operator {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub procedure: String,
    pub left_arg_type: String,
    pub right_arg_type: String,
    /// Qualified operator name; `0` or empty when absent
    pub commutator_op: String,
    pub negator_op: String,
    /// Selectivity estimators; `-` or empty when absent
    pub restrict_function: String,
    pub join_function: String,
    pub can_hash: bool,
    pub can_merge: bool,
}

pub(crate) fn is_unset(value: &str) -> bool {
    matches!(value, "" | "-" | "0")
}

impl Operator {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_OPERATOR, self.oid)
    }

    fn arg_or_none(arg: &str) -> &str {
        if is_unset(arg) { "NONE" } else { arg }
    }

    fn signature(&self) -> String {
        format!(
            "{}({}, {})",
            self.name,
            Self::arg_or_none(&self.left_arg_type),
            Self::arg_or_none(&self.right_arg_type)
        )
    }
}

impl TocObject for Operator {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.schema.clone(), self.signature(), "OPERATOR")
    }

    fn fqn(&self) -> String {
        if self.schema.is_empty() {
            self.signature()
        } else {
            format!("{}.{}", self.schema, self.signature())
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorFamily {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub index_method: String,
}

impl OperatorFamily {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_OPFAMILY, self.oid)
    }
}

impl TocObject for OperatorFamily {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(
            self.schema.clone(),
            format!("{} USING {}", self.name, self.index_method),
            "OPERATOR FAMILY",
        )
    }

    fn fqn(&self) -> String {
        format!("{} USING {}", make_fqn(&self.schema, &self.name), self.index_method)
    }
}

/// One `OPERATOR n op` member of an operator class
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorClassOperator {
    pub strategy_number: i32,
    pub operator: String,
    pub recheck: bool,
    /// Sort family of an ordering operator; empty for search operators
    pub order_by_family: String,
}

/// One `FUNCTION n fn` member of an operator class
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorClassFunction {
    pub support_number: i32,
    /// Set together with `right_type` when they differ from the class type
    pub left_type: String,
    pub right_type: String,
    pub function_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorClass {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub family_schema: String,
    pub family_name: String,
    pub index_method: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub default: bool,
    /// `-` when the stored type is the class type
    pub storage_type: String,
    pub operators: Vec<OperatorClassOperator>,
    pub functions: Vec<OperatorClassFunction>,
}

impl OperatorClass {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_OPCLASS, self.oid)
    }
}

impl TocObject for OperatorClass {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(
            self.schema.clone(),
            format!("{} USING {}", self.name, self.index_method),
            "OPERATOR CLASS",
        )
    }

    fn fqn(&self) -> String {
        format!("{} USING {}", make_fqn(&self.schema, &self.name), self.index_method)
    }
}
