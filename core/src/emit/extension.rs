use std::io::Write;

use super::Emitter;
use super::function::lookup_function;
use crate::acl::{MetadataMap, ObjectMetadata};
use crate::ddl::{Extension, FunctionInfoMap, ProceduralLanguage};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::TocObject;

/// Extensions are created with their schema first on the search path so
/// their objects land there.
pub fn create_extension_statement(extension: &Extension) -> String {
    format!(
        "\n\nSET search_path={schema},pg_catalog;\nCREATE EXTENSION IF NOT EXISTS {name} WITH SCHEMA {schema};\nSET search_path=pg_catalog;\n",
        schema = extension.schema,
        name = extension.name
    )
}

/// `CREATE PROCEDURAL LANGUAGE` followed by an `OWNER TO` for each support
/// function so they end up owned like the language.
pub fn create_language_statement(language: &ProceduralLanguage, functions: &FunctionInfoMap) -> Result<String> {
    let trusted = if language.pl_trusted { "TRUSTED " } else { "" };
    let mut sql = format!("\n\nCREATE {trusted}PROCEDURAL LANGUAGE {};", language.name);
    if !language.owner.is_empty() {
        for oid in language.support_functions() {
            let function = lookup_function(functions, oid)?;
            sql.push_str(&format!(
                "\nALTER FUNCTION {} OWNER TO {};",
                function.signature(),
                language.owner
            ));
        }
    }
    sql.push('\n');
    Ok(sql)
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_extensions(&mut self, extensions: &[Extension], metadata: &MetadataMap) -> Result<()> {
        for extension in extensions {
            self.emit(extension.metadata_entry(), &create_extension_statement(extension))?;
            gpdump_trace_object!("EXTENSION", extension.name);
            self.print_object_metadata(extension, metadata.get(&extension.unique_id()), None)?;
        }
        Ok(())
    }

    pub fn print_create_language(
        &mut self,
        language: &ProceduralLanguage,
        functions: &FunctionInfoMap,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(language.metadata_entry(), &create_language_statement(language, functions)?)?;
        gpdump_trace_object!("PROCEDURAL LANGUAGE", language.name);
        self.print_object_metadata(language, metadata, None)
    }
}
