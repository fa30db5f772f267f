use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::make_fqn;

// =============================================================================
// Type Variants
// =============================================================================

/// Placeholder `CREATE TYPE name;` so base and range types can reference
/// their I/O functions before the full definition exists.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellType {
    pub oid: u32,
    pub schema: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseType {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub input: String,
    pub output: String,
    pub receive: String,
    pub send: String,
    pub mod_in: String,
    pub mod_out: String,
    pub internal_length: i32,
    pub is_passed_by_value: bool,
    /// `c`har, `s`hort, `i`nt, `d`ouble
    pub alignment: String,
    /// `p`lain, `e`xternal, `m`ain, e`x`tended
    pub storage: String,
    pub default_val: String,
    pub element: String,
    pub delimiter: String,
    /// Default encoding options for columns of this type
    pub storage_options: String,
    pub category: String,
    pub preferred: bool,
    pub collatable: bool,
}

impl Default for BaseType {
    fn default() -> Self {
        Self {
            oid: 0,
            schema: String::new(),
            name: String::new(),
            input: String::new(),
            output: String::new(),
            receive: String::new(),
            send: String::new(),
            mod_in: String::new(),
            mod_out: String::new(),
            internal_length: -1,
            is_passed_by_value: false,
            alignment: "c".to_string(),
            storage: "p".to_string(),
            default_val: String::new(),
            element: String::new(),
            delimiter: String::new(),
            storage_options: String::new(),
            category: "U".to_string(),
            preferred: false,
            collatable: false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositeAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub comment: String,
    pub collation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositeType {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub attributes: Vec<CompositeAttribute>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumType {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    /// Labels in sort order, unquoted
    pub labels: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Domain {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub default_val: String,
    pub collation: String,
    pub base_type: String,
    pub not_null: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RangeType {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub sub_type: String,
    pub collation: String,
    pub sub_type_op_class: String,
    pub canonical: String,
    pub sub_type_diff: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Collation {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub collate: String,
    pub ctype: String,
    /// `c` libc, `i` icu, `d` default; empty on generations without providers
    pub provider: String,
    pub nondeterministic: bool,
}

// =============================================================================
// TOC Identity
// =============================================================================

macro_rules! impl_type_toc_object {
    ($ty:ty, $class:expr, $object_type:literal) => {
        impl $ty {
            pub fn unique_id(&self) -> UniqueId {
                UniqueId::new($class, self.oid)
            }
        }

        impl TocObject for $ty {
            fn metadata_entry(&self) -> MetadataEntry {
                MetadataEntry::new(self.schema.clone(), self.name.clone(), $object_type)
            }

            fn fqn(&self) -> String {
                make_fqn(&self.schema, &self.name)
            }
        }
    };
}

impl_type_toc_object!(ShellType, class::PG_TYPE, "TYPE");
impl_type_toc_object!(BaseType, class::PG_TYPE, "TYPE");
impl_type_toc_object!(CompositeType, class::PG_TYPE, "TYPE");
impl_type_toc_object!(EnumType, class::PG_TYPE, "TYPE");
impl_type_toc_object!(Domain, class::PG_TYPE, "DOMAIN");
impl_type_toc_object!(RangeType, class::PG_TYPE, "TYPE");
impl_type_toc_object!(Collation, class::PG_COLLATION, "COLLATION");
