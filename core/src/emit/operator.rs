use std::io::Write;

use super::Emitter;
use crate::acl::ObjectMetadata;
use crate::ddl::operator::is_unset;
use crate::ddl::{Operator, OperatorClass, OperatorFamily};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::TocObject;
use crate::utils::make_fqn;

pub fn create_operator_statement(operator: &Operator) -> String {
    let mut fields = Vec::new();
    if !is_unset(&operator.left_arg_type) {
        fields.push(format!("LEFTARG = {}", operator.left_arg_type));
    }
    if !is_unset(&operator.right_arg_type) {
        fields.push(format!("RIGHTARG = {}", operator.right_arg_type));
    }
    if !is_unset(&operator.commutator_op) {
        fields.push(format!("COMMUTATOR = OPERATOR({})", operator.commutator_op));
    }
    if !is_unset(&operator.negator_op) {
        fields.push(format!("NEGATOR = OPERATOR({})", operator.negator_op));
    }
    if !is_unset(&operator.restrict_function) {
        fields.push(format!("RESTRICT = {}", operator.restrict_function));
    }
    if !is_unset(&operator.join_function) {
        fields.push(format!("JOIN = {}", operator.join_function));
    }
    if operator.can_hash {
        fields.push("HASHES".to_string());
    }
    if operator.can_merge {
        fields.push("MERGES".to_string());
    }

    let mut sql = format!(
        "\n\nCREATE OPERATOR {} (\n\tPROCEDURE = {}",
        make_fqn(&operator.schema, &operator.name),
        operator.procedure
    );
    for field in fields {
        sql.push_str(&format!(",\n\t{field}"));
    }
    sql.push_str("\n);\n");
    sql
}

pub fn create_operator_family_statement(family: &OperatorFamily) -> String {
    format!("\n\nCREATE OPERATOR FAMILY {};\n", family.fqn())
}

/// Header, then operator and support function members, then `STORAGE`.
/// An operator class with no members still needs a body, so `STORAGE`
/// falls back to the class type.
pub fn create_operator_class_statement(class: &OperatorClass) -> String {
    let default = if class.default { "DEFAULT " } else { "" };
    let mut sql = format!(
        "\n\nCREATE OPERATOR CLASS {}\n\t{default}FOR TYPE {} USING {}",
        make_fqn(&class.schema, &class.name),
        class.type_,
        class.index_method
    );
    if !class.family_name.is_empty() && class.family_name != class.name {
        sql.push_str(&format!(
            " FAMILY {}",
            make_fqn(&class.family_schema, &class.family_name)
        ));
    }

    let mut members = Vec::new();
    for op in &class.operators {
        let mut member = format!("OPERATOR {} {}", op.strategy_number, op.operator);
        if op.recheck {
            member.push_str(" RECHECK");
        }
        if !op.order_by_family.is_empty() {
            member.push_str(&format!(" FOR ORDER BY {}", op.order_by_family));
        }
        members.push(member);
    }
    for function in &class.functions {
        let types = if function.left_type.is_empty() {
            String::new()
        } else {
            format!("({}, {}) ", function.left_type, function.right_type)
        };
        members.push(format!(
            "FUNCTION {} {types}{}",
            function.support_number, function.function_name
        ));
    }
    if !is_unset(&class.storage_type) {
        members.push(format!("STORAGE {}", class.storage_type));
    } else if members.is_empty() {
        members.push(format!("STORAGE {}", class.type_));
    }

    sql.push_str(&format!(" AS\n\t{};\n", members.join(",\n\t")));
    sql
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_operator(&mut self, operator: &Operator, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(operator.metadata_entry(), &create_operator_statement(operator))?;
        gpdump_trace_object!("OPERATOR", operator.fqn());
        self.print_object_metadata(operator, metadata, None)
    }

    pub fn print_create_operator_family(
        &mut self,
        family: &OperatorFamily,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(family.metadata_entry(), &create_operator_family_statement(family))?;
        gpdump_trace_object!("OPERATOR FAMILY", family.fqn());
        self.print_object_metadata(family, metadata, None)
    }

    pub fn print_create_operator_class(
        &mut self,
        class: &OperatorClass,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(class.metadata_entry(), &create_operator_class_statement(class))?;
        gpdump_trace_object!("OPERATOR CLASS", class.fqn());
        self.print_object_metadata(class, metadata, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogCapabilities;
    use crate::ddl::{OperatorClassFunction, OperatorClassOperator};
    use crate::emit::object_metadata_statements;

    fn operator() -> Operator {
        Operator {
            oid: 1,
            schema: "public".into(),
            name: "##".into(),
            procedure: "public.path_inter".into(),
            left_arg_type: "public.path".into(),
            right_arg_type: "public.path".into(),
            commutator_op: "0".into(),
            negator_op: "0".into(),
            restrict_function: "-".into(),
            join_function: "-".into(),
            ..Default::default()
        }
    }

    fn opclass() -> OperatorClass {
        OperatorClass {
            oid: 1,
            schema: "public".into(),
            name: "testclass".into(),
            family_schema: "public".into(),
            family_name: "testclass".into(),
            index_method: "gist".into(),
            type_: "integer".into(),
            storage_type: "-".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_operator_minimal() {
        assert_eq!(
            create_operator_statement(&operator()),
            "\n\nCREATE OPERATOR public.## (\n\tPROCEDURE = public.path_inter,\
             \n\tLEFTARG = public.path,\n\tRIGHTARG = public.path\n);\n"
        );
    }

    #[test]
    fn test_create_operator_all_fields() {
        let operator = Operator {
            left_arg_type: "-".into(),
            commutator_op: "public.##".into(),
            negator_op: "public.###".into(),
            restrict_function: "eqsel(internal,oid,internal,integer)".into(),
            join_function: "eqjoinsel(internal,oid,internal,smallint)".into(),
            can_hash: true,
            can_merge: true,
            ..operator()
        };
        assert_eq!(
            create_operator_statement(&operator),
            "\n\nCREATE OPERATOR public.## (\n\tPROCEDURE = public.path_inter,\
             \n\tRIGHTARG = public.path,\n\tCOMMUTATOR = OPERATOR(public.##),\
             \n\tNEGATOR = OPERATOR(public.###),\n\tRESTRICT = eqsel(internal,oid,internal,integer),\
             \n\tJOIN = eqjoinsel(internal,oid,internal,smallint),\n\tHASHES,\n\tMERGES\n);\n"
        );
        assert_eq!(operator.fqn(), "public.##(NONE, public.path)");
    }

    #[test]
    fn test_operator_metadata_uses_signature() {
        let metadata = ObjectMetadata {
            owner: "testrole".into(),
            comment: "an operator".into(),
            ..Default::default()
        };
        let statements =
            object_metadata_statements(&operator(), &metadata, None, CatalogCapabilities::default());
        assert_eq!(
            statements,
            [
                "COMMENT ON OPERATOR public.##(public.path, public.path) IS 'an operator';",
                "ALTER OPERATOR public.##(public.path, public.path) OWNER TO testrole;",
            ]
        );
    }

    #[test]
    fn test_create_operator_family() {
        let family = OperatorFamily {
            oid: 1,
            schema: "public".into(),
            name: "testfam".into(),
            index_method: "hash".into(),
        };
        assert_eq!(
            create_operator_family_statement(&family),
            "\n\nCREATE OPERATOR FAMILY public.testfam USING hash;\n"
        );
        assert_eq!(family.metadata_entry().name, "testfam USING hash");
    }

    #[test]
    fn test_create_operator_class_without_members_uses_storage() {
        assert_eq!(
            create_operator_class_statement(&opclass()),
            "\n\nCREATE OPERATOR CLASS public.testclass\n\tFOR TYPE integer USING gist AS\
             \n\tSTORAGE integer;\n"
        );
    }

    #[test]
    fn test_create_operator_class_with_members() {
        let class = OperatorClass {
            default: true,
            family_name: "testfam".into(),
            storage_type: "text".into(),
            operators: vec![
                OperatorClassOperator {
                    strategy_number: 1,
                    operator: "=(integer,integer)".into(),
                    recheck: true,
                    ..Default::default()
                },
                OperatorClassOperator {
                    strategy_number: 15,
                    operator: "<->(integer,integer)".into(),
                    order_by_family: "pg_catalog.integer_ops".into(),
                    ..Default::default()
                },
            ],
            functions: vec![
                OperatorClassFunction {
                    support_number: 1,
                    function_name: "abs(integer)".into(),
                    ..Default::default()
                },
                OperatorClassFunction {
                    support_number: 2,
                    left_type: "integer".into(),
                    right_type: "bigint".into(),
                    function_name: "int4(bigint)".into(),
                },
            ],
            ..opclass()
        };
        assert_eq!(
            create_operator_class_statement(&class),
            "\n\nCREATE OPERATOR CLASS public.testclass\n\tDEFAULT FOR TYPE integer USING gist \
             FAMILY public.testfam AS\n\tOPERATOR 1 =(integer,integer) RECHECK,\
             \n\tOPERATOR 15 <->(integer,integer) FOR ORDER BY pg_catalog.integer_ops,\
             \n\tFUNCTION 1 abs(integer),\n\tFUNCTION 2 (integer, bigint) int4(bigint),\
             \n\tSTORAGE text;\n"
        );
    }
}
