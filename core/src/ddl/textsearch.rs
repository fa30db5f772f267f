use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::make_fqn;

/// Function names are qualified and empty when unset.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSearchParser {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub start_func: String,
    pub token_func: String,
    pub end_func: String,
    pub lex_types_func: String,
    pub headline_func: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSearchTemplate {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    pub init_func: String,
    pub lexize_func: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSearchDictionary {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    /// Qualified template name
    pub template: String,
    /// Rendered `key = 'value'` list
    pub init_option: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSearchConfiguration {
    pub oid: u32,
    pub schema: String,
    pub name: String,
    /// Qualified parser name
    pub parser: String,
    /// Token type → dictionaries in lookup order
    pub token_to_dicts: BTreeMap<String, Vec<String>>,
}

macro_rules! impl_text_search_toc_object {
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

impl_text_search_toc_object!(TextSearchParser, class::PG_TS_PARSER, "TEXT SEARCH PARSER");
impl_text_search_toc_object!(TextSearchTemplate, class::PG_TS_TEMPLATE, "TEXT SEARCH TEMPLATE");
impl_text_search_toc_object!(TextSearchDictionary, class::PG_TS_DICT, "TEXT SEARCH DICTIONARY");
impl_text_search_toc_object!(
    TextSearchConfiguration,
    class::PG_TS_CONFIG,
    "TEXT SEARCH CONFIGURATION"
);
