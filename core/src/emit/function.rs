use std::io::Write;

use super::Emitter;
use crate::acl::ObjectMetadata;
use crate::catalog::CatalogCapabilities;
use crate::ddl::{Aggregate, Cast, Conversion, Function, FunctionInfo, FunctionInfoMap, Protocol};
use crate::error::{DumpError, Result};
use crate::toc::TocObject;
use crate::utils::{escape_single_quotes, make_fqn};
use crate::{gpdump_trace_object, gpdump_trace_skip};

/// Wrap `body` in the shortest `$_..._$` tag that does not occur in it.
pub fn dollar_quote(body: &str) -> String {
    let mut tag = String::from("$");
    loop {
        let candidate = format!("{tag}$");
        if !body.contains(&candidate) {
            return format!("{candidate}{body}{candidate}");
        }
        tag.push('_');
    }
}

fn function_modifiers(function: &Function) -> String {
    let mut sql = String::new();
    match function.data_access.as_str() {
        "c" => sql.push_str(" CONTAINS SQL"),
        "m" => sql.push_str(" MODIFIES SQL DATA"),
        "n" => sql.push_str(" NO SQL"),
        "r" => sql.push_str(" READS SQL DATA"),
        _ => {}
    }
    match function.volatility.as_str() {
        "i" => sql.push_str(" IMMUTABLE"),
        "s" => sql.push_str(" STABLE"),
        _ => {}
    }
    match function.exec_location.as_str() {
        "m" => sql.push_str(" EXECUTE ON MASTER"),
        "s" => sql.push_str(" EXECUTE ON ALL SEGMENTS"),
        _ => {}
    }
    if function.is_window {
        sql.push_str(" WINDOW");
    }
    if function.is_strict {
        sql.push_str(" STRICT");
    }
    if function.is_leakproof {
        sql.push_str(" LEAKPROOF");
    }
    if function.is_security_definer {
        sql.push_str(" SECURITY DEFINER");
    }

    let default_cost = if matches!(function.language.as_str(), "c" | "internal") {
        1.0
    } else {
        100.0
    };
    if function.cost != 0.0 && function.cost != default_cost {
        sql.push_str(&format!("\nCOST {}", function.cost));
    }
    if function.returns_set && function.num_rows != 0.0 && function.num_rows != 1000.0 {
        sql.push_str(&format!("\nROWS {}", function.num_rows));
    }
    if !function.config.is_empty() {
        sql.push_str(&format!("\n{}", function.config));
    }
    sql
}

pub fn create_function_statement(function: &Function) -> String {
    let setof = if function.returns_set && !function.result_type.starts_with("SETOF ") {
        "SETOF "
    } else {
        ""
    };
    let mut sql = format!(
        "\n\nCREATE FUNCTION {}({}) RETURNS {setof}{} AS",
        make_fqn(&function.schema, &function.name),
        function.arguments,
        function.result_type
    );

    // `probin` is NULL or "-" for functions without a shared library
    if !function.binary_path.is_empty() && function.binary_path != "-" {
        sql.push_str(&format!(
            "\n'{}', '{}'\n",
            function.binary_path, function.function_body
        ));
    } else {
        sql.push_str(&format!("\n{}\n", dollar_quote(&function.function_body)));
    }

    sql.push_str(&format!("LANGUAGE {}", function.language));
    sql.push_str(&function_modifiers(function));
    sql.push_str(";\n");
    sql
}

pub(crate) fn lookup_function(functions: &FunctionInfoMap, oid: u32) -> Result<&FunctionInfo> {
    functions.get(&oid).ok_or(DumpError::MissingFunction(oid))
}

fn function_name(functions: &FunctionInfoMap, oid: u32) -> Result<String> {
    Ok(lookup_function(functions, oid)?.qualified_name.clone())
}

pub fn create_aggregate_statement(
    aggregate: &Aggregate,
    functions: &FunctionInfoMap,
    caps: CatalogCapabilities,
) -> Result<String> {
    let ordered = if aggregate.is_ordered { "ORDERED " } else { "" };
    let mut sql = format!(
        "\n\nCREATE {ordered}AGGREGATE {}({}) (\n\tSFUNC = {},\n\tSTYPE = {}",
        make_fqn(&aggregate.schema, &aggregate.name),
        aggregate.signature_arguments(),
        function_name(functions, aggregate.transition_function)?,
        aggregate.transition_data_type
    );
    if aggregate.preliminary_function != 0 {
        sql.push_str(&format!(
            ",\n\t{} = {}",
            caps.aggregate_combine_keyword(),
            function_name(functions, aggregate.preliminary_function)?
        ));
    }
    if aggregate.final_function != 0 {
        sql.push_str(&format!(
            ",\n\tFINALFUNC = {}",
            function_name(functions, aggregate.final_function)?
        ));
    }
    if aggregate.final_func_extra {
        sql.push_str(",\n\tFINALFUNC_EXTRA");
    }
    if let Some(initial) = &aggregate.initial_value {
        sql.push_str(&format!(",\n\tINITCOND = '{}'", escape_single_quotes(initial)));
    }
    if !aggregate.sort_operator.is_empty() {
        sql.push_str(&format!(",\n\tSORTOP = {}", aggregate.sort_operator));
    }
    if aggregate.hypothetical {
        sql.push_str(",\n\tHYPOTHETICAL");
    }
    sql.push_str("\n);\n");
    Ok(sql)
}

pub fn create_cast_statement(cast: &Cast) -> String {
    let method = match cast.cast_method.as_str() {
        "i" => "\tWITH INOUT".to_string(),
        "b" => "\tWITHOUT FUNCTION".to_string(),
        _ => format!(
            "\tWITH FUNCTION {}({})",
            make_fqn(&cast.function_schema, &cast.function_name),
            cast.function_args
        ),
    };
    let context = match cast.cast_context.as_str() {
        "a" => "\nAS ASSIGNMENT",
        "i" => "\nAS IMPLICIT",
        _ => "",
    };
    format!("\n\nCREATE CAST {}\n{method}{context};\n", cast.fqn())
}

pub fn create_conversion_statement(conversion: &Conversion) -> String {
    let default = if conversion.is_default { " DEFAULT" } else { "" };
    format!(
        "\n\nCREATE{default} CONVERSION {} FOR '{}' TO '{}' FROM {};\n",
        conversion.fqn(),
        conversion.for_encoding,
        conversion.to_encoding,
        conversion.conversion_function
    )
}

/// `None` when every function the protocol uses ships with the server, in
/// which case the protocol is built in and not dumped.
pub fn create_protocol_statement(protocol: &Protocol, functions: &FunctionInfoMap) -> Result<Option<String>> {
    let mut clauses = Vec::new();
    let mut user_defined = false;
    for (keyword, oid) in [
        ("readfunc", protocol.read_function),
        ("writefunc", protocol.write_function),
        ("validatorfunc", protocol.validator),
    ] {
        if oid == 0 {
            continue;
        }
        let function = lookup_function(functions, oid)?;
        user_defined |= !function.is_internal;
        clauses.push(format!("{keyword} = {}", function.qualified_name));
    }
    if !user_defined {
        return Ok(None);
    }
    let trusted = if protocol.trusted { "TRUSTED " } else { "" };
    Ok(Some(format!(
        "\n\nCREATE {trusted}PROTOCOL {} ({});\n",
        protocol.name,
        clauses.join(", ")
    )))
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_function(&mut self, function: &Function, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(function.metadata_entry(), &create_function_statement(function))?;
        gpdump_trace_object!("FUNCTION", function.fqn());
        self.print_object_metadata(function, metadata, None)
    }

    pub fn print_create_aggregate(
        &mut self,
        aggregate: &Aggregate,
        functions: &FunctionInfoMap,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        let statement = create_aggregate_statement(aggregate, functions, self.caps())?;
        self.emit(aggregate.metadata_entry(), &statement)?;
        gpdump_trace_object!("AGGREGATE", aggregate.fqn());
        self.print_object_metadata(aggregate, metadata, None)
    }

    pub fn print_create_cast(&mut self, cast: &Cast, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(cast.metadata_entry(), &create_cast_statement(cast))?;
        gpdump_trace_object!("CAST", cast.fqn());
        self.print_object_metadata(cast, metadata, None)
    }

    pub fn print_create_conversion(
        &mut self,
        conversion: &Conversion,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(conversion.metadata_entry(), &create_conversion_statement(conversion))?;
        gpdump_trace_object!("CONVERSION", conversion.fqn());
        self.print_object_metadata(conversion, metadata, None)
    }

    pub fn print_create_protocol(
        &mut self,
        protocol: &Protocol,
        functions: &FunctionInfoMap,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        let Some(statement) = create_protocol_statement(protocol, functions)? else {
            gpdump_trace_skip!("PROTOCOL", protocol.name, "built in");
            return Ok(());
        };
        self.emit(protocol.metadata_entry(), &statement)?;
        gpdump_trace_object!("PROTOCOL", protocol.name);
        self.print_object_metadata(protocol, metadata, None)
    }
}
