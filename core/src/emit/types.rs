use std::io::Write;

use super::Emitter;
use crate::acl::ObjectMetadata;
use crate::ddl::{
    BaseType, Collation, CompositeType, Constraint, Domain, EnumType, RangeType, ShellType,
};
use crate::error::{DumpError, Result};
use crate::gpdump_trace_object;
use crate::toc::TocObject;
use crate::utils::escape_single_quotes;

// =============================================================================
// Statement Builders
// =============================================================================

pub fn create_shell_type_statement(fqn: &str) -> String {
    format!("\n\nCREATE TYPE {fqn};\n")
}

/// Full definition of a base type. Alignment `c` and storage `p` are the
/// engine defaults and are left out.
pub fn create_base_type_statement(base: &BaseType) -> String {
    let fqn = base.fqn();
    let mut sql = format!(
        "\n\nCREATE TYPE {fqn} (\n\tINPUT = {},\n\tOUTPUT = {}",
        base.input, base.output
    );
    let mut clause = |name: &str, value: &str| {
        if !value.is_empty() {
            sql.push_str(&format!(",\n\t{name} = {value}"));
        }
    };
    clause("RECEIVE", &base.receive);
    clause("SEND", &base.send);
    clause("TYPMOD_IN", &base.mod_in);
    clause("TYPMOD_OUT", &base.mod_out);

    if base.internal_length > 0 {
        sql.push_str(&format!(",\n\tINTERNALLENGTH = {}", base.internal_length));
    }
    if base.is_passed_by_value {
        sql.push_str(",\n\tPASSEDBYVALUE");
    }
    let alignment = match base.alignment.as_str() {
        "d" => Some("double"),
        "i" => Some("int4"),
        "s" => Some("int2"),
        _ => None,
    };
    if let Some(alignment) = alignment {
        sql.push_str(&format!(",\n\tALIGNMENT = {alignment}"));
    }
    let storage = match base.storage.as_str() {
        "e" => Some("external"),
        "m" => Some("main"),
        "x" => Some("extended"),
        _ => None,
    };
    if let Some(storage) = storage {
        sql.push_str(&format!(",\n\tSTORAGE = {storage}"));
    }
    if !base.default_val.is_empty() {
        sql.push_str(&format!(",\n\tDEFAULT = '{}'", base.default_val));
    }
    if !base.element.is_empty() {
        sql.push_str(&format!(",\n\tELEMENT = {}", base.element));
    }
    if !base.delimiter.is_empty() && base.delimiter != "," {
        sql.push_str(&format!(",\n\tDELIMITER = '{}'", base.delimiter));
    }
    if !base.category.is_empty() && base.category != "U" {
        sql.push_str(&format!(",\n\tCATEGORY = '{}'", base.category));
    }
    if base.preferred {
        sql.push_str(",\n\tPREFERRED = true");
    }
    if base.collatable {
        sql.push_str(",\n\tCOLLATABLE = true");
    }
    sql.push_str("\n);\n");

    if !base.storage_options.is_empty() {
        sql.push_str(&format!(
            "\nALTER TYPE {fqn}\n\tSET DEFAULT ENCODING ({});",
            base.storage_options
        ));
    }
    sql
}

pub fn create_composite_type_statement(composite: &CompositeType) -> String {
    let attributes: Vec<String> = composite
        .attributes
        .iter()
        .map(|att| {
            let collation = if att.collation.is_empty() {
                String::new()
            } else {
                format!(" COLLATE {}", att.collation)
            };
            format!("\t{} {}{collation}", att.name, att.type_name)
        })
        .collect();
    format!(
        "\n\nCREATE TYPE {} AS (\n{}\n);",
        composite.fqn(),
        attributes.join(",\n")
    )
}

pub fn create_enum_type_statement(enum_type: &EnumType) -> String {
    let labels: Vec<String> = enum_type
        .labels
        .iter()
        .map(|label| format!("'{}'", escape_single_quotes(label)))
        .collect();
    format!(
        "\n\nCREATE TYPE {} AS ENUM (\n\t{}\n);\n",
        enum_type.fqn(),
        labels.join(",\n\t")
    )
}

pub fn create_range_type_statement(range: &RangeType) -> String {
    let mut sql = format!(
        "\n\nCREATE TYPE {} AS RANGE (\n\tSUBTYPE = {}",
        range.fqn(),
        range.sub_type
    );
    for (name, value) in [
        ("SUBTYPE_OPCLASS", &range.sub_type_op_class),
        ("COLLATION", &range.collation),
        ("CANONICAL", &range.canonical),
        ("SUBTYPE_DIFF", &range.sub_type_diff),
    ] {
        if !value.is_empty() {
            sql.push_str(&format!(",\n\t{name} = {value}"));
        }
    }
    sql.push_str("\n);\n");
    sql
}

/// CREATE DOMAIN with its check constraints inlined.
pub fn create_domain_statement(domain: &Domain, constraints: &[&Constraint]) -> String {
    let mut sql = format!("\n\nCREATE DOMAIN {} AS {}", domain.fqn(), domain.base_type);
    if !domain.default_val.is_empty() {
        sql.push_str(&format!(" DEFAULT {}", domain.default_val));
    }
    if !domain.collation.is_empty() {
        sql.push_str(&format!(" COLLATE {}", domain.collation));
    }
    if domain.not_null {
        sql.push_str(" NOT NULL");
    }
    for constraint in constraints {
        if let Some(def) = &constraint.def {
            sql.push_str(&format!("\n\tCONSTRAINT {} {def}", constraint.name));
        }
    }
    sql.push_str(";\n");
    sql
}

/// Provider `c` is libc and `i` is icu. The database default provider (`d`)
/// and catalogs without providers print no PROVIDER clause.
pub fn create_collation_statement(collation: &Collation) -> Result<String> {
    let provider = match collation.provider.as_str() {
        "" | "d" => None,
        "c" => Some("libc"),
        "i" => Some("icu"),
        other => {
            return Err(DumpError::InvalidCollationProvider {
                collation: collation.fqn(),
                provider: other.to_string(),
            });
        }
    };
    let mut sql = format!(
        "\n\nCREATE COLLATION {} (LC_COLLATE = '{}', LC_CTYPE = '{}'",
        collation.fqn(),
        collation.collate,
        collation.ctype
    );
    if let Some(provider) = provider {
        sql.push_str(&format!(", PROVIDER = '{provider}'"));
    }
    if collation.nondeterministic {
        sql.push_str(", DETERMINISTIC = 'false'");
    }
    sql.push_str(");");
    Ok(sql)
}

// =============================================================================
// Printers
// =============================================================================

impl<W: Write> Emitter<'_, W> {
    /// Shell entries carry no metadata; the full definition that follows
    /// prints it.
    pub fn print_create_shell_type(&mut self, obj: &dyn TocObject) -> Result<()> {
        self.emit(obj.metadata_entry(), &create_shell_type_statement(&obj.fqn()))
    }

    pub fn print_create_base_type(&mut self, base: &BaseType, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(base.metadata_entry(), &create_base_type_statement(base))?;
        gpdump_trace_object!("BASE TYPE", base.fqn());
        self.print_object_metadata(base, metadata, None)
    }

    pub fn print_create_composite_type(
        &mut self,
        composite: &CompositeType,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(composite.metadata_entry(), &create_composite_type_statement(composite))?;
        gpdump_trace_object!("COMPOSITE TYPE", composite.fqn());
        self.print_object_metadata(composite, metadata, None)?;

        let fqn = composite.fqn();
        let comments: Vec<String> = composite
            .attributes
            .iter()
            .filter(|att| !att.comment.is_empty())
            .map(|att| {
                format!(
                    "COMMENT ON COLUMN {fqn}.{} IS '{}';",
                    att.name,
                    escape_single_quotes(&att.comment)
                )
            })
            .collect();
        self.print_statements(composite, &comments)
    }

    pub fn print_create_enum_type(&mut self, enum_type: &EnumType, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(enum_type.metadata_entry(), &create_enum_type_statement(enum_type))?;
        gpdump_trace_object!("ENUM TYPE", enum_type.fqn());
        self.print_object_metadata(enum_type, metadata, None)
    }

    pub fn print_create_range_type(&mut self, range: &RangeType, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(range.metadata_entry(), &create_range_type_statement(range))?;
        gpdump_trace_object!("RANGE TYPE", range.fqn());
        self.print_object_metadata(range, metadata, None)
    }

    pub fn print_create_domain(
        &mut self,
        domain: &Domain,
        constraints: &[&Constraint],
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(domain.metadata_entry(), &create_domain_statement(domain, constraints))?;
        gpdump_trace_object!("DOMAIN", domain.fqn());
        self.print_object_metadata(domain, metadata, None)
    }

    pub fn print_create_collation(&mut self, collation: &Collation, metadata: Option<&ObjectMetadata>) -> Result<()> {
        let sql = create_collation_statement(collation)?;
        self.emit(collation.metadata_entry(), &sql)?;
        gpdump_trace_object!("COLLATION", collation.fqn());
        self.print_object_metadata(collation, metadata, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::CompositeAttribute;

    fn base_type() -> BaseType {
        BaseType {
            oid: 1,
            schema: "public".into(),
            name: "base_type".into(),
            input: "input_fn".into(),
            output: "output_fn".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_type_defaults_only() {
        assert_eq!(
            create_base_type_statement(&base_type()),
            "\n\nCREATE TYPE public.base_type (\n\tINPUT = input_fn,\n\tOUTPUT = output_fn\n);\n"
        );
    }

    #[test]
    fn test_base_type_all_clauses() {
        let base = BaseType {
            receive: "receive_fn".into(),
            send: "send_fn".into(),
            mod_in: "modin_fn".into(),
            mod_out: "modout_fn".into(),
            internal_length: 16,
            is_passed_by_value: true,
            alignment: "s".into(),
            storage: "e".into(),
            default_val: "42".into(),
            element: "integer".into(),
            delimiter: ";".into(),
            category: "N".into(),
            preferred: true,
            collatable: true,
            storage_options: "compresstype=zlib, compresslevel=1, blocksize=32768".into(),
            ..base_type()
        };
        assert_eq!(
            create_base_type_statement(&base),
            "\n\nCREATE TYPE public.base_type (\n\
             \tINPUT = input_fn,\n\
             \tOUTPUT = output_fn,\n\
             \tRECEIVE = receive_fn,\n\
             \tSEND = send_fn,\n\
             \tTYPMOD_IN = modin_fn,\n\
             \tTYPMOD_OUT = modout_fn,\n\
             \tINTERNALLENGTH = 16,\n\
             \tPASSEDBYVALUE,\n\
             \tALIGNMENT = int2,\n\
             \tSTORAGE = external,\n\
             \tDEFAULT = '42',\n\
             \tELEMENT = integer,\n\
             \tDELIMITER = ';',\n\
             \tCATEGORY = 'N',\n\
             \tPREFERRED = true,\n\
             \tCOLLATABLE = true\n\
             );\n\
             \nALTER TYPE public.base_type\n\
             \tSET DEFAULT ENCODING (compresstype=zlib, compresslevel=1, blocksize=32768);"
        );
    }

    #[test]
    fn test_composite_and_enum() {
        let composite = CompositeType {
            oid: 1,
            schema: "public".into(),
            name: "composite_type".into(),
            attributes: vec![
                CompositeAttribute {
                    name: "name".into(),
                    type_name: "integer".into(),
                    ..Default::default()
                },
                CompositeAttribute {
                    name: "name1".into(),
                    type_name: "text".into(),
                    collation: "public.some_coll".into(),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(
            create_composite_type_statement(&composite),
            "\n\nCREATE TYPE public.composite_type AS (\n\tname integer,\n\tname1 text COLLATE public.some_coll\n);"
        );

        let enum_type = EnumType {
            oid: 2,
            schema: "public".into(),
            name: "enum_type".into(),
            labels: vec!["bar".into(), "b'az".into()],
        };
        assert_eq!(
            create_enum_type_statement(&enum_type),
            "\n\nCREATE TYPE public.enum_type AS ENUM (\n\t'bar',\n\t'b''az'\n);\n"
        );
    }

    #[test]
    fn test_range_type() {
        let range = RangeType {
            oid: 1,
            schema: "public".into(),
            name: "textrange".into(),
            sub_type: "text".into(),
            collation: "public.some_coll".into(),
            sub_type_diff: "public.diff".into(),
            ..Default::default()
        };
        assert_eq!(
            create_range_type_statement(&range),
            "\n\nCREATE TYPE public.textrange AS RANGE (\n\tSUBTYPE = text,\n\
             \tCOLLATION = public.some_coll,\n\tSUBTYPE_DIFF = public.diff\n);\n"
        );
    }

    #[test]
    fn test_domain_with_constraints() {
        let domain = Domain {
            oid: 1,
            schema: "public".into(),
            name: "domain1".into(),
            base_type: "numeric".into(),
            default_val: "4".into(),
            collation: "public.mycollation".into(),
            not_null: true,
        };
        let check = Constraint {
            oid: 2,
            name: "domain1_check".into(),
            con_type: "c".into(),
            def: Some("CHECK (VALUE > 2)".into()),
            owning_object: "public.domain1".into(),
            is_domain_constraint: true,
            ..Default::default()
        };
        assert_eq!(
            create_domain_statement(&domain, &[&check]),
            "\n\nCREATE DOMAIN public.domain1 AS numeric DEFAULT 4 COLLATE public.mycollation NOT NULL\
             \n\tCONSTRAINT domain1_check CHECK (VALUE > 2);\n"
        );
    }

    #[test]
    fn test_collation_providers() {
        let collation = |provider: &str, nondeterministic: bool| Collation {
            oid: 1,
            schema: "schema1".into(),
            name: "collation1".into(),
            collate: "POSIX".into(),
            ctype: "POSIX".into(),
            provider: provider.into(),
            nondeterministic,
        };
        assert_eq!(
            create_collation_statement(&collation("", false)).unwrap(),
            "\n\nCREATE COLLATION schema1.collation1 (LC_COLLATE = 'POSIX', LC_CTYPE = 'POSIX');"
        );
        assert_eq!(
            create_collation_statement(&collation("i", true)).unwrap(),
            "\n\nCREATE COLLATION schema1.collation1 (LC_COLLATE = 'POSIX', LC_CTYPE = 'POSIX', \
             PROVIDER = 'icu', DETERMINISTIC = 'false');"
        );
        assert!(matches!(
            create_collation_statement(&collation("z", false)),
            Err(DumpError::InvalidCollationProvider { .. })
        ));
    }
}
