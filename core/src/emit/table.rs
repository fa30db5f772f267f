use std::io::Write;

use super::Emitter;
use super::external::create_external_table_statement;
use crate::acl::{ObjectMetadata, privileges_statements};
use crate::ddl::{ColumnDefinition, PartitionLevel, Table};
use crate::error::Result;
use crate::toc::TocObject;
use crate::utils::escape_single_quotes;
use crate::gpdump_trace_object;

/// Column lines for a CREATE TABLE body, joined by `,\n`.
///
/// Typed tables print `WITH OPTIONS` instead of repeating the column type.
pub fn column_definitions<'a>(
    columns: impl IntoIterator<Item = &'a ColumnDefinition>,
    typed: bool,
) -> String {
    columns
        .into_iter()
        .filter(|c| !c.is_dropped)
        .map(|column| {
            let mut line = if typed {
                format!("\t{} WITH OPTIONS", column.name)
            } else {
                format!("\t{} {}", column.name, column.type_name)
            };
            if !column.fdw_options.is_empty() {
                line.push_str(&format!(" OPTIONS ({})", column.fdw_options));
            }
            if !column.collation.is_empty() {
                line.push_str(&format!(" COLLATE {}", column.collation));
            }
            if column.has_default {
                line.push_str(&format!(" DEFAULT {}", column.default_val));
            }
            if column.not_null {
                line.push_str(" NOT NULL");
            }
            if !column.encoding.is_empty() {
                line.push_str(&format!(" ENCODING ({})", column.encoding));
            }
            line
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

/// CREATE TABLE for regular and foreign tables, followed by the partition
/// template and per-column ALTER statements.
pub fn create_table_statement(table: &Table) -> String {
    let def = &table.def;
    let fqn = table.relation.fqn();

    let modifier = if def.is_unlogged {
        "UNLOGGED "
    } else if table.is_foreign() {
        "FOREIGN "
    } else {
        ""
    };
    let of_type = if def.table_type.is_empty() {
        String::new()
    } else {
        format!("OF {} ", def.table_type)
    };

    let mut sql = format!("\n\nCREATE {modifier}TABLE {fqn} {of_type}(\n");
    let columns = column_definitions(&def.column_defs, !def.table_type.is_empty());
    if !columns.is_empty() {
        sql.push_str(&columns);
        sql.push('\n');
    }
    sql.push_str(") ");

    if !def.inherits.is_empty() {
        sql.push_str(&format!("INHERITS ({}) ", def.inherits.join(", ")));
    }
    if let Some(foreign) = &def.foreign_def {
        sql.push_str(&format!("SERVER {} ", foreign.server));
        if !foreign.options.is_empty() {
            sql.push_str(&format!("OPTIONS ({}) ", foreign.options));
        }
    }
    if !def.storage_opts.is_empty() {
        sql.push_str(&format!("WITH ({}) ", def.storage_opts));
    }
    if !def.tablespace_name.is_empty() {
        sql.push_str(&format!("TABLESPACE {} ", def.tablespace_name));
    }
    if !table.is_foreign() {
        sql.push_str(table.dist_policy());
    }
    if !def.part_def.is_empty() {
        sql.push(' ');
        sql.push_str(def.part_def.trim());
    }
    sql.push_str(";\n");
    if !def.part_template_def.is_empty() {
        sql.push_str(&format!("{};\n", def.part_template_def.trim()));
    }

    for column in table.live_columns() {
        if column.stat_target > -1 {
            sql.push_str(&format!(
                "\nALTER TABLE ONLY {fqn} ALTER COLUMN {} SET STATISTICS {};",
                column.name, column.stat_target
            ));
        }
        if !column.storage_type.is_empty() {
            sql.push_str(&format!(
                "\nALTER TABLE ONLY {fqn} ALTER COLUMN {} SET STORAGE {};",
                column.name, column.storage_type
            ));
        }
        if !column.options.is_empty() {
            sql.push_str(&format!(
                "\nALTER TABLE ONLY {fqn} ALTER COLUMN {} SET ({});",
                column.name, column.options
            ));
        }
    }
    sql
}

/// Column comments, column privileges, column security labels and replica
/// identity, in that order per column.
pub fn post_create_table_statements(table: &Table, owner: &str) -> Vec<String> {
    let fqn = table.relation.fqn();
    let mut statements = Vec::new();
    for column in table.live_columns() {
        if !column.comment.is_empty() {
            statements.push(format!(
                "COMMENT ON COLUMN {fqn}.{} IS '{}';",
                column.name,
                escape_single_quotes(&column.comment)
            ));
        }
        if let Some(acls) = &column.privileges
            && let Some(grants) =
                privileges_statements(acls, owner, &fqn, "COLUMN", Some(&column.name))
        {
            statements.push(grants);
        }
        if !column.security_label.is_empty() {
            statements.push(format!(
                "SECURITY LABEL FOR {} ON COLUMN {fqn}.{} IS '{}';",
                column.security_label_provider,
                column.name,
                escape_single_quotes(&column.security_label)
            ));
        }
    }

    // Foreign tables always report `n` and reject the ALTER.
    if !table.is_foreign() {
        match table.def.replica_identity.as_str() {
            "n" => statements.push(format!("ALTER TABLE {fqn} REPLICA IDENTITY NOTHING;")),
            "f" => statements.push(format!("ALTER TABLE {fqn} REPLICA IDENTITY FULL;")),
            _ => {}
        }
    }
    statements
}

impl<W: Write> Emitter<'_, W> {
    /// CREATE statement, object metadata, then column-level statements.
    pub fn print_create_table(&mut self, table: &Table, metadata: Option<&ObjectMetadata>) -> Result<()> {
        table.validate()?;
        let sql = match &table.def.ext_table_def {
            Some(ext) if table.def.partition_level != PartitionLevel::Parent => {
                create_external_table_statement(table, ext, self.caps)?
            }
            _ => create_table_statement(table),
        };
        self.emit(table.metadata_entry(), &sql)?;
        gpdump_trace_object!("TABLE", table.relation.fqn());

        self.print_object_metadata(table, metadata, None)?;
        let owner = metadata.map(|m| m.owner.as_str()).unwrap_or_default();
        let statements = post_create_table_statements(table, owner);
        self.print_statements(table, &statements)
    }
}
