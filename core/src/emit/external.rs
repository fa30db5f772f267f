use std::io::Write;

use super::Emitter;
use super::table::column_definitions;
use crate::catalog::CatalogCapabilities;
use crate::ddl::{
    ExecLocation, ExternalPartition, ExternalProtocol, ExternalTableDefinition, ExternalType,
    Table,
};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::MetadataEntry;
use crate::utils::{escape_single_quotes, make_fqn};

/// CREATE EXTERNAL TABLE with its LOCATION/EXECUTE, FORMAT, OPTIONS,
/// ENCODING and error-handling clauses.
pub fn create_external_table_statement(
    table: &Table,
    ext: &ExternalTableDefinition,
    caps: CatalogCapabilities,
) -> Result<String> {
    let (ext_type, protocol) = ext.classify()?;

    let mut sql = format!(
        "\n\nCREATE {} TABLE {} (\n",
        ext_type.as_sql(),
        table.relation.fqn()
    );
    let columns = column_definitions(&table.def.column_defs, false);
    if !columns.is_empty() {
        sql.push_str(&columns);
        sql.push('\n');
    }
    sql.push_str(") ");

    if ext_type != ExternalType::WritableWeb {
        let uris: Vec<&str> = ext.uris().collect();
        if !uris.is_empty() {
            sql.push_str(&format!("LOCATION (\n\t'{}'\n)", uris.join("',\n\t'")));
        }
    }
    let on_master = ext_type == ExternalType::Readable
        || (ext_type == ExternalType::WritableWeb && protocol == ExternalProtocol::S3);
    if on_master && ext.exec_location == "MASTER_ONLY" {
        sql.push_str(" ON MASTER");
    }
    if ext_type.is_web() && !ext.command.is_empty() {
        let location: ExecLocation = ext.exec_location.parse()?;
        sql.push_str(&format!(
            "EXECUTE '{}'{location}",
            escape_single_quotes(&ext.command)
        ));
    }
    sql.push('\n');

    let format_name = ext.format_name();
    sql.push_str(&format!("FORMAT '{format_name}'"));
    if !ext.format_opts.is_empty() {
        let opts = if format_name == "custom" {
            ext.format_opts.replacen("formatter ", "formatter=", 1)
        } else {
            ext.format_opts.clone()
        };
        sql.push_str(&format!(" ({})", opts.trim()));
    }
    sql.push('\n');

    if !ext.options.is_empty() {
        sql.push_str(&format!("OPTIONS (\n\t{}\n)\n", ext.options));
    }
    sql.push_str(&format!("ENCODING '{}'", ext.encoding));

    if ext_type.is_readable() {
        if ext.err_table == table.relation.name {
            sql.push_str("\nLOG ERRORS");
            if ext.log_errors_persistently && caps.supports_persistent_error_log() {
                sql.push_str(" PERSISTENTLY");
            }
        }
        if ext.reject_limit != 0 {
            let unit = match ext.reject_limit_type.as_str() {
                "r" => "ROWS",
                "p" => "PERCENT",
                _ => "",
            };
            sql.push_str(&format!("\nSEGMENT REJECT LIMIT {} {unit}", ext.reject_limit));
        }
    }
    if ext.writable {
        sql.push('\n');
        sql.push_str(table.dist_policy());
    }
    sql.push(';');
    Ok(sql)
}

/// Swap a standalone external table into its parent, then drop the
/// now-empty standalone name.
pub fn exchange_partition_statement(partition: &ExternalPartition, external_fqn: &str) -> String {
    let parent = make_fqn(&partition.parent_schema, &partition.parent_name);
    let target = if partition.partition_name.is_empty() {
        format!("FOR (RANK({}))", partition.rank)
    } else {
        partition.partition_name.clone()
    };
    format!(
        "\n\nALTER TABLE {parent} EXCHANGE PARTITION {target} \
         WITH TABLE {external_fqn} WITHOUT VALIDATION;\n\nDROP TABLE {external_fqn};"
    )
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_exchange_partition(
        &mut self,
        partition: &ExternalPartition,
        external_fqn: &str,
    ) -> Result<()> {
        let entry = MetadataEntry::new(
            partition.parent_schema.clone(),
            partition.parent_name.clone(),
            "EXCHANGE PARTITION",
        );
        self.emit(entry, &exchange_partition_statement(partition, external_fqn))?;
        gpdump_trace_object!("EXCHANGE PARTITION", external_fqn);
        Ok(())
    }
}
