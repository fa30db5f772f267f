use std::io::Write;

use super::Emitter;
use crate::acl::ObjectMetadata;
use crate::ddl::{Sequence, SequenceOwner};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::escape_single_quotes;

/// CREATE SEQUENCE followed by the `setval` call that restores its position.
pub fn create_sequence_statement(sequence: &Sequence) -> String {
    let fqn = sequence.relation.fqn();
    let mut sql = format!("\n\nCREATE SEQUENCE {fqn}");
    if !sequence.is_called {
        sql.push_str(&format!("\n\tSTART WITH {}", sequence.last_val));
    }
    sql.push_str(&format!("\n\tINCREMENT BY {}", sequence.increment));

    if sequence.has_implicit_max() {
        sql.push_str("\n\tNO MAXVALUE");
    } else {
        sql.push_str(&format!("\n\tMAXVALUE {}", sequence.max_val));
    }
    if sequence.has_implicit_min() {
        sql.push_str("\n\tNO MINVALUE");
    } else {
        sql.push_str(&format!("\n\tMINVALUE {}", sequence.min_val));
    }
    sql.push_str(&format!("\n\tCACHE {}", sequence.cache_val));
    if sequence.is_cycled {
        sql.push_str("\n\tCYCLE");
    }
    sql.push(';');

    sql.push_str(&format!(
        "\n\nSELECT pg_catalog.setval('{}', {}, {});\n",
        escape_single_quotes(&fqn),
        sequence.last_val,
        sequence.is_called
    ));
    sql
}

pub fn alter_sequence_owner_statement(owner: &SequenceOwner) -> String {
    format!(
        "\n\nALTER SEQUENCE {} OWNED BY {};\n",
        owner.sequence_fqn, owner.owning_column
    )
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_sequence(
        &mut self,
        sequence: &Sequence,
        metadata: Option<&ObjectMetadata>,
    ) -> Result<()> {
        self.emit(sequence.metadata_entry(), &create_sequence_statement(sequence))?;
        gpdump_trace_object!("SEQUENCE", sequence.fqn());
        self.print_object_metadata(sequence, metadata, None)
    }

    pub fn print_alter_sequence_owner(&mut self, sequence: &Sequence, owner: &SequenceOwner) -> Result<()> {
        let entry = MetadataEntry::new(
            sequence.relation.schema.clone(),
            sequence.relation.name.clone(),
            "SEQUENCE OWNER",
        )
        .with_reference(owner.owning_table.clone());
        self.emit(entry, &alter_sequence_owner_statement(owner))
    }
}
