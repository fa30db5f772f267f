use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::make_fqn;

/// `pg_proc` row for a plain (non-aggregate) function.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Function {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub returns_set: bool,
    pub function_body: String,
    /// `probin`; empty or `-` when unused
    pub binary_path: String,
    pub arguments: String,
    pub ident_args: String,
    pub result_type: String,
    /// `i`mmutable, `s`table, `v`olatile
    pub volatility: String,
    pub is_strict: bool,
    pub is_leakproof: bool,
    pub is_security_definer: bool,
    /// Pre-rendered `SET ...` lines
    pub config: String,
    pub cost: f32,
    pub num_rows: f32,
    /// `n`o sql, `c`ontains sql, `r`eads, `m`odifies
    pub data_access: String,
    pub language: String,
    pub is_window: bool,
    /// `a`ny, `m`aster, `s`egments
    pub exec_location: String,
}

impl Default for Function {
    fn default() -> Self {
        Self {
            oid: 0,
            schema: String::new(),
            name: String::new(),
            returns_set: false,
            function_body: String::new(),
            binary_path: String::new(),
            arguments: String::new(),
            ident_args: String::new(),
            result_type: String::new(),
            volatility: "v".to_string(),
            is_strict: false,
            is_leakproof: false,
            is_security_definer: false,
            config: String::new(),
            cost: 0.0,
            num_rows: 0.0,
            data_access: String::new(),
            language: String::new(),
            is_window: false,
            exec_location: "a".to_string(),
        }
    }
}

impl Function {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_PROC, self.oid)
    }
}

impl TocObject for Function {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(
            self.schema.clone(),
            format!("{}({})", self.name, self.ident_args),
            "FUNCTION",
        )
    }

    fn fqn(&self) -> String {
        format!("{}({})", make_fqn(&self.schema, &self.name), self.ident_args)
    }
}

/// Qualified name and arguments of any function an object may reference,
/// built-ins included.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionInfo {
    pub oid: u32,
    pub qualified_name: String,
    pub arguments: String,
    /// Lives in `pg_catalog` or is otherwise part of the server
    pub is_internal: bool,
}

impl FunctionInfo {
    pub fn signature(&self) -> String {
        format!("{}({})", self.qualified_name, self.arguments)
    }
}

pub type FunctionInfoMap = HashMap<u32, FunctionInfo>;

/// `pg_aggregate` joined with its `pg_proc` row. Transition, combine and
/// final functions are function oids resolved through a [`FunctionInfoMap`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Aggregate {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub arguments: String,
    pub ident_args: String,
    pub transition_function: u32,
    pub transition_data_type: String,
    /// Combine function, `PREFUNC` in this dialect; 0 when absent
    pub preliminary_function: u32,
    pub final_function: u32,
    pub final_func_extra: bool,
    /// `None` is a NULL initial state
    pub initial_value: Option<String>,
    /// Rendered `OPERATOR(...)`; empty when absent
    pub sort_operator: String,
    pub hypothetical: bool,
    pub is_ordered: bool,
}

impl Aggregate {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_PROC, self.oid)
    }

    fn args_or_star(&self, args: &str) -> String {
        if args.is_empty() { "*".to_string() } else { args.to_string() }
    }

    pub fn signature_arguments(&self) -> String {
        self.args_or_star(&self.arguments)
    }
}

impl TocObject for Aggregate {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(
            self.schema.clone(),
            format!("{}({})", self.name, self.ident_args),
            "AGGREGATE",
        )
    }

    fn fqn(&self) -> String {
        format!(
            "{}({})",
            make_fqn(&self.schema, &self.name),
            self.args_or_star(&self.ident_args)
        )
    }
}

/// `pg_cast` row with both types already formatted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Cast {
    pub oid: u32,
    pub source_type_fqn: String,
    pub target_type_fqn: String,
    pub function_schema: String,
    pub function_name: String,
    pub function_args: String,
    /// `e`xplicit, `a`ssignment, `i`mplicit
    pub cast_context: String,
    /// `f`unction, `i`nout, `b`inary coercible
    pub cast_method: String,
}

impl Cast {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_CAST, self.oid)
    }
}

impl TocObject for Cast {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("pg_catalog", self.fqn(), "CAST")
    }

    fn fqn(&self) -> String {
        format!("({} AS {})", self.source_type_fqn, self.target_type_fqn)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversion {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub for_encoding: String,
    pub to_encoding: String,
    /// Qualified name of the conversion function
    pub conversion_function: String,
    pub is_default: bool,
}

impl Conversion {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_CONVERSION, self.oid)
    }
}

impl TocObject for Conversion {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new(self.schema.clone(), self.name.clone(), "CONVERSION")
    }

    fn fqn(&self) -> String {
        make_fqn(&self.schema, &self.name)
    }
}

/// `pg_extprotocol` row: a custom external table protocol.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Protocol {
    pub oid: u32,
    pub name: String,
    pub trusted: bool,
    /// Function oids; 0 when unset
    pub read_function: u32,
    pub write_function: u32,
    pub validator: u32,
}

impl Protocol {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_EXTPROTOCOL, self.oid)
    }
}

impl TocObject for Protocol {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "PROTOCOL")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}
