//! Table of contents for a backup
//!
//! The TOC (toc.json) records, per output section, the byte range every emitted
//! object occupies so a restore can extract or skip individual objects without
//! re-parsing the DDL stream.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Sections
// =============================================================================

/// Logical output stream a metadata entry belongs to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Global,
    Predata,
    Postdata,
    Statistics,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Global,
        Section::Predata,
        Section::Postdata,
        Section::Statistics,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Section::Global => "global",
            Section::Predata => "predata",
            Section::Postdata => "postdata",
            Section::Statistics => "statistics",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Entries
// =============================================================================

/// Byte range of one emitted object within its section
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataEntry {
    pub schema: String,
    pub name: String,
    pub object_type: String,
    pub reference_object: String,
    pub start_byte: u64,
    pub end_byte: u64,
}

impl MetadataEntry {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            object_type: object_type.into(),
            ..Default::default()
        }
    }

    /// Set the object this entry depends on (owning table, sequence owner, ...)
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_object = reference.into();
        self
    }

    pub(crate) fn with_range(mut self, start: u64, end: u64) -> Self {
        self.start_byte = start;
        self.end_byte = end;
        self
    }
}

/// One physical table selected for data extraction
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorDataEntry {
    pub schema: String,
    pub name: String,
    pub oid: u32,
    /// Column list for the bulk extract, e.g. `(a,b,c)`
    pub attribute_string: String,
    pub rows_copied: u64,
    /// FQN of the partition root when the table is a leaf
    pub partition_root: String,
}

/// Anything that can be recorded in the TOC.
pub trait TocObject {
    /// Entry skeleton (schema, name, type, reference) without a byte range
    fn metadata_entry(&self) -> MetadataEntry;
    /// Fully qualified name used in DDL referring to the object
    fn fqn(&self) -> String;
    /// Keyword used in COMMENT/OWNER/GRANT statements when it differs from
    /// the TOC type
    fn metadata_type(&self) -> String {
        self.metadata_entry().object_type
    }
}

// =============================================================================
// TOC
// =============================================================================

/// Per-section, append-only lists of entries
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Toc {
    pub global_entries: Vec<MetadataEntry>,
    pub predata_entries: Vec<MetadataEntry>,
    pub postdata_entries: Vec<MetadataEntry>,
    pub statistics_entries: Vec<MetadataEntry>,
    pub data_entries: Vec<CoordinatorDataEntry>,
}

/// Disjoint mutable borrows of every section, so independent passes can each
/// own one list.
pub struct TocSections<'a> {
    pub global: &'a mut Vec<MetadataEntry>,
    pub predata: &'a mut Vec<MetadataEntry>,
    pub postdata: &'a mut Vec<MetadataEntry>,
    pub statistics: &'a mut Vec<MetadataEntry>,
}

impl Toc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, section: Section) -> &[MetadataEntry] {
        match section {
            Section::Global => &self.global_entries,
            Section::Predata => &self.predata_entries,
            Section::Postdata => &self.postdata_entries,
            Section::Statistics => &self.statistics_entries,
        }
    }

    pub fn section_mut(&mut self, section: Section) -> &mut Vec<MetadataEntry> {
        match section {
            Section::Global => &mut self.global_entries,
            Section::Predata => &mut self.predata_entries,
            Section::Postdata => &mut self.postdata_entries,
            Section::Statistics => &mut self.statistics_entries,
        }
    }

    pub fn split_sections(&mut self) -> TocSections<'_> {
        TocSections {
            global: &mut self.global_entries,
            predata: &mut self.predata_entries,
            postdata: &mut self.postdata_entries,
            statistics: &mut self.statistics_entries,
        }
    }

    /// Append an entry spanning `[start, end)` to a section
    pub fn add_metadata_entry(&mut self, section: Section, entry: MetadataEntry, start: u64, end: u64) {
        self.section_mut(section).push(entry.with_range(start, end));
    }

    pub fn add_data_entry(&mut self, entry: CoordinatorDataEntry) {
        self.data_entries.push(entry);
    }

    /// Load TOC from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize TOC to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load TOC from file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Save TOC to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_metadata_entry() {
        let mut toc = Toc::new();
        toc.add_metadata_entry(
            Section::Predata,
            MetadataEntry::new("public", "foo", "TABLE"),
            0,
            42,
        );
        let entries = toc.entries(Section::Predata);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start_byte, 0);
        assert_eq!(entries[0].end_byte, 42);
        assert!(toc.entries(Section::Postdata).is_empty());
    }

    #[test]
    fn test_split_sections_are_independent() {
        let mut toc = Toc::new();
        let sections = toc.split_sections();
        sections.predata.push(MetadataEntry::new("s", "a", "TABLE"));
        sections.statistics.push(MetadataEntry::new("s", "a", "STATISTICS"));
        assert_eq!(toc.predata_entries.len(), 1);
        assert_eq!(toc.statistics_entries.len(), 1);
    }

    #[test]
    fn test_toc_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup").join("toc.json");

        let mut toc = Toc::new();
        toc.add_metadata_entry(
            Section::Postdata,
            MetadataEntry::new("public", "idx", "INDEX").with_reference("public.foo"),
            10,
            30,
        );
        toc.add_data_entry(CoordinatorDataEntry {
            schema: "public".into(),
            name: "foo".into(),
            oid: 16384,
            attribute_string: "(a,b)".into(),
            ..Default::default()
        });
        toc.save(&path).unwrap();

        let loaded = Toc::load(&path).unwrap();
        assert_eq!(loaded, toc);
        assert!(toc.to_json().unwrap().contains("\"referenceObject\": \"public.foo\""));
    }
}
