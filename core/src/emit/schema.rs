use std::io::Write;

use super::Emitter;
use crate::acl::MetadataMap;
use crate::ddl::Schema;
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::TocObject;

impl<W: Write> Emitter<'_, W> {
    /// `public` already exists on restore, so only its metadata is printed.
    pub fn print_create_schemas(&mut self, schemas: &[Schema], metadata: &MetadataMap) -> Result<()> {
        for schema in schemas {
            if schema.name != "public" {
                self.emit(
                    schema.metadata_entry(),
                    &format!("\n\nCREATE SCHEMA {};\n", schema.name),
                )?;
                gpdump_trace_object!("SCHEMA", schema.name);
            }
            self.print_object_metadata(schema, metadata.get(&schema.unique_id()), None)?;
        }
        Ok(())
    }
}
