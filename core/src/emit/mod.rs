//! Per-object-kind DDL emitters.
//!
//! Each submodule has pure `*_statement` builders returning the exact DDL text
//! and `print_*` methods on [`Emitter`] that write that text and record its byte
//! range in the TOC. Every byte written to a section goes through
//! [`Emitter::emit`], so consecutive TOC entries are contiguous.

mod constraint;
mod extension;
mod external;
mod foreign;
mod function;
mod global;
mod operator;
mod postdata;
mod schema;
mod sequence;
mod table;
mod textsearch;
mod types;
mod view;

pub use constraint::{constraint_statement, order_constraints};
pub use extension::{create_extension_statement, create_language_statement};
pub use external::{create_external_table_statement, exchange_partition_statement};
pub use foreign::{
    create_foreign_data_wrapper_statement, create_foreign_server_statement,
    create_user_mapping_statement,
};
pub use function::{
    create_aggregate_statement, create_cast_statement, create_conversion_statement,
    create_function_statement, create_protocol_statement, dollar_quote,
};
pub use global::{
    create_database_statement, create_resource_queue_statement, create_role_statement,
    create_tablespace_statement, resource_group_statement, role_grant_statement,
    session_gucs_statement,
};
pub use operator::{
    create_operator_class_statement, create_operator_family_statement, create_operator_statement,
};
pub use sequence::{alter_sequence_owner_statement, create_sequence_statement};
pub use table::{column_definitions, create_table_statement, post_create_table_statements};
pub use textsearch::{
    create_text_search_configuration_statement, create_text_search_dictionary_statement,
    create_text_search_parser_statement, create_text_search_template_statement,
    text_search_mapping_statements,
};
pub use types::{
    create_base_type_statement, create_collation_statement, create_composite_type_statement,
    create_domain_statement, create_enum_type_statement, create_range_type_statement,
    create_shell_type_statement,
};
pub use view::create_view_statement;

use std::io::Write;

use crate::acl::ObjectMetadata;
use crate::catalog::CatalogCapabilities;
use crate::error::Result;
use crate::sink::ByteCountWriter;
use crate::toc::{MetadataEntry, Section, TocObject};

/// Writes one output section and appends its TOC entries in emission order.
pub struct Emitter<'t, W: Write> {
    out: ByteCountWriter<W>,
    entries: &'t mut Vec<MetadataEntry>,
    section: Section,
    caps: CatalogCapabilities,
}

impl<'t, W: Write> Emitter<'t, W> {
    pub fn new(
        writer: W,
        entries: &'t mut Vec<MetadataEntry>,
        section: Section,
        caps: CatalogCapabilities,
    ) -> Self {
        Self {
            out: ByteCountWriter::new(writer),
            entries,
            section,
            caps,
        }
    }

    pub fn byte_count(&self) -> u64 {
        self.out.byte_count()
    }

    pub fn caps(&self) -> CatalogCapabilities {
        self.caps
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out.into_inner())
    }

    /// Write `text` and record one entry spanning exactly those bytes.
    pub fn emit(&mut self, entry: MetadataEntry, text: &str) -> Result<()> {
        let start = self.out.byte_count();
        self.out.write_all(text.as_bytes())?;
        self.entries.push(entry.with_range(start, self.out.byte_count()));
        Ok(())
    }

    /// Write each statement as its own TOC entry attributed to `obj`.
    ///
    /// In postdata the entries are tagged `<TYPE> METADATA` and reference the
    /// object itself, so a parallel restore can run them after the object.
    pub fn print_statements(&mut self, obj: &dyn TocObject, statements: &[String]) -> Result<()> {
        for statement in statements {
            let mut entry = obj.metadata_entry();
            if self.section == Section::Postdata {
                entry.object_type = format!("{} METADATA", entry.object_type);
                entry.reference_object = obj.fqn();
            }
            self.emit(entry, &format!("\n\n{statement}\n"))?;
        }
        Ok(())
    }

    /// COMMENT, OWNER, REVOKE/GRANT and SECURITY LABEL for one object, each
    /// only when the corresponding field is set.
    pub fn print_object_metadata(
        &mut self,
        obj: &dyn TocObject,
        metadata: Option<&ObjectMetadata>,
        owning_table: Option<&str>,
    ) -> Result<()> {
        let Some(metadata) = metadata else {
            return Ok(());
        };
        let statements = object_metadata_statements(obj, metadata, owning_table, self.caps);
        self.print_statements(obj, &statements)
    }
}

/// The metadata block in its fixed order.
pub fn object_metadata_statements(
    obj: &dyn TocObject,
    metadata: &ObjectMetadata,
    owning_table: Option<&str>,
    caps: CatalogCapabilities,
) -> Vec<String> {
    let object_type = obj.metadata_type();
    let name = obj.fqn();
    [
        metadata.comment_statement(&name, &object_type, owning_table),
        metadata.owner_statement(&name, &object_type, caps),
        metadata.privileges_statements(&name, &object_type, None),
        metadata.security_label_statement(&name, &object_type),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::parse_acl;
    use crate::ddl::Schema;

    #[test]
    fn test_emit_records_contiguous_ranges() {
        let mut entries = Vec::new();
        let mut emitter = Emitter::new(
            Vec::new(),
            &mut entries,
            Section::Predata,
            CatalogCapabilities::default(),
        );
        emitter
            .emit(MetadataEntry::new("", "a", "SCHEMA"), "\n\nCREATE SCHEMA a;\n")
            .unwrap();
        emitter
            .emit(MetadataEntry::new("", "b", "SCHEMA"), "\n\nCREATE SCHEMA b;\n")
            .unwrap();
        let total = emitter.byte_count();
        let out = emitter.finish().unwrap();

        assert_eq!(out.len() as u64, total);
        assert_eq!(entries[0].start_byte, 0);
        assert_eq!(entries[0].end_byte, entries[1].start_byte);
        assert_eq!(entries[1].end_byte, total);
    }

    #[test]
    fn test_metadata_block_order() {
        let schema = Schema {
            oid: 1,
            name: "s".into(),
        };
        let metadata = ObjectMetadata {
            privileges: vec![parse_acl("testrole=UC/gpadmin").unwrap().unwrap()],
            owner: "gpadmin".into(),
            comment: "a schema".into(),
            security_label_provider: "dummy".into(),
            security_label: "secret".into(),
        };
        let statements = object_metadata_statements(
            &schema,
            &metadata,
            None,
            CatalogCapabilities::default(),
        );
        assert_eq!(statements.len(), 4);
        assert!(statements[0].starts_with("COMMENT ON SCHEMA s IS 'a schema';"));
        assert!(statements[1].starts_with("ALTER SCHEMA s OWNER TO gpadmin;"));
        assert!(statements[2].starts_with("REVOKE ALL ON SCHEMA s FROM PUBLIC;"));
        assert!(statements[2].ends_with("GRANT ALL ON SCHEMA s TO testrole;"));
        assert!(statements[3].starts_with("SECURITY LABEL FOR dummy ON SCHEMA s"));
    }

    #[test]
    fn test_postdata_metadata_entries_are_tagged() {
        let index = crate::ddl::IndexDefinition {
            oid: 5,
            name: "idx".into(),
            owning_schema: "public".into(),
            owning_table: "foo".into(),
            def: Some("CREATE INDEX idx ON public.foo USING btree (a)".into()),
            ..Default::default()
        };
        let mut entries = Vec::new();
        let mut emitter = Emitter::new(
            Vec::new(),
            &mut entries,
            Section::Postdata,
            CatalogCapabilities::default(),
        );
        emitter
            .print_statements(&index, &["COMMENT ON INDEX public.idx IS 'x';".to_string()])
            .unwrap();
        drop(emitter);
        assert_eq!(entries[0].object_type, "INDEX METADATA");
        assert_eq!(entries[0].reference_object, "public.idx");
    }
}
