use std::io::Write;

use super::Emitter;
use super::function::lookup_function;
use crate::acl::ObjectMetadata;
use crate::ddl::{ForeignDataWrapper, ForeignServer, FunctionInfoMap, UserMapping};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::TocObject;

pub fn create_foreign_data_wrapper_statement(
    fdw: &ForeignDataWrapper,
    functions: &FunctionInfoMap,
) -> Result<String> {
    let mut sql = format!("\n\nCREATE FOREIGN DATA WRAPPER {}", fdw.name);
    if fdw.handler != 0 {
        sql.push_str(&format!(
            "\n\tHANDLER {}",
            lookup_function(functions, fdw.handler)?.qualified_name
        ));
    }
    if fdw.validator != 0 {
        sql.push_str(&format!(
            "\n\tVALIDATOR {}",
            lookup_function(functions, fdw.validator)?.qualified_name
        ));
    }
    if !fdw.options.is_empty() {
        sql.push_str(&format!("\n\tOPTIONS ({})", fdw.options));
    }
    sql.push_str(";\n");
    Ok(sql)
}

pub fn create_foreign_server_statement(server: &ForeignServer) -> String {
    let mut sql = format!("\n\nCREATE SERVER {}", server.name);
    if !server.server_type.is_empty() {
        sql.push_str(&format!("\n\tTYPE '{}'", server.server_type));
    }
    if !server.version.is_empty() {
        sql.push_str(&format!("\n\tVERSION '{}'", server.version));
    }
    sql.push_str(&format!("\n\tFOREIGN DATA WRAPPER {}", server.foreign_data_wrapper));
    if !server.options.is_empty() {
        sql.push_str(&format!("\n\tOPTIONS ({})", server.options));
    }
    sql.push_str(";\n");
    sql
}

pub fn create_user_mapping_statement(mapping: &UserMapping) -> String {
    let mut sql = format!(
        "\n\nCREATE USER MAPPING FOR {}\n\tSERVER {}",
        mapping.user, mapping.server
    );
    if !mapping.options.is_empty() {
        sql.push_str(&format!("\n\tOPTIONS ({})", mapping.options));
    }
    sql.push_str(";\n");
    sql
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_foreign_data_wrapper(
        &mut self,
        fdw: &ForeignDataWrapper,
        functions: &FunctionInfoMap,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(fdw.metadata_entry(), &create_foreign_data_wrapper_statement(fdw, functions)?)?;
        gpdump_trace_object!("FOREIGN DATA WRAPPER", fdw.name);
        self.print_object_metadata(fdw, metadata, None)
    }

    pub fn print_create_foreign_server(
        &mut self,
        server: &ForeignServer,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(server.metadata_entry(), &create_foreign_server_statement(server))?;
        gpdump_trace_object!("FOREIGN SERVER", server.name);
        self.print_object_metadata(server, metadata, None)
    }

    pub fn print_create_user_mappings(&mut self, mappings: &[UserMapping]) -> Result<()> {
        for mapping in mappings {
            self.emit(mapping.metadata_entry(), &create_user_mapping_statement(mapping))?;
            gpdump_trace_object!("USER MAPPING", mapping.fqn());
        }
        Ok(())
    }
}
