use std::io::Write;

use super::Emitter;
use crate::acl::MetadataMap;
use crate::ddl::Constraint;
use crate::error::Result;
use crate::toc::TocObject;
use crate::{gpdump_trace_object, gpdump_trace_skip};

/// Table constraints in emission order: every non-foreign-key constraint,
/// then every foreign key, each group keeping its input order. Domain
/// constraints are printed inline with their domain and are left out.
pub fn order_constraints(constraints: &[Constraint]) -> Vec<&Constraint> {
    let (foreign_keys, others): (Vec<&Constraint>, Vec<&Constraint>) = constraints
        .iter()
        .filter(|c| !c.is_domain_constraint)
        .partition(|c| c.is_foreign_key());
    others.into_iter().chain(foreign_keys).collect()
}

/// `ALTER TABLE [ONLY] owner ADD CONSTRAINT ...`; partition parents drop
/// `ONLY` so the constraint cascades to every child.
pub fn constraint_statement(constraint: &Constraint) -> Option<String> {
    let def = constraint.def.as_deref()?;
    let only = if constraint.is_partition_parent { "" } else { "ONLY " };
    Some(format!(
        "\n\nALTER TABLE {only}{} ADD CONSTRAINT {} {def};\n",
        constraint.owning_object, constraint.name
    ))
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_constraints(&mut self, constraints: &[Constraint], metadata: &MetadataMap) -> Result<()> {
        for constraint in order_constraints(constraints) {
            let Some(sql) = constraint_statement(constraint) else {
                gpdump_trace_skip!("CONSTRAINT", constraint.name);
                continue;
            };
            self.emit(constraint.metadata_entry(), &sql)?;
            gpdump_trace_object!("CONSTRAINT", constraint.name);
            self.print_object_metadata(
                constraint,
                metadata.get(&constraint.unique_id()),
                Some(&constraint.owning_object),
            )?;
        }
        Ok(())
    }
}
