use std::io::Write;

use super::Emitter;
use crate::acl::ObjectMetadata;
use crate::ddl::View;
use crate::ddl::table::DEFAULT_DIST_POLICY;
use crate::error::Result;
use crate::toc::TocObject;
use crate::{gpdump_trace_object, gpdump_trace_skip};

/// CREATE [MATERIALIZED] VIEW, or `None` when the catalog returned no
/// definition.
///
/// Materialized views are created empty; their stored definition carries a
/// trailing `;` that is dropped before `WITH NO DATA`.
pub fn create_view_statement(view: &View) -> Option<String> {
    let definition = view.definition.as_deref()?;
    let fqn = view.fqn();
    let options = if view.options.is_empty() {
        String::new()
    } else {
        format!(" WITH ({})", view.options)
    };

    if !view.is_materialized {
        return Some(format!("\n\nCREATE VIEW {fqn}{options} AS {definition}\n"));
    }

    let tablespace = if view.tablespace.is_empty() {
        String::new()
    } else {
        format!(" TABLESPACE {}", view.tablespace)
    };
    let body = definition.trim_end().trim_end_matches(';');
    let dist_policy = if view.dist_policy.is_empty() {
        DEFAULT_DIST_POLICY
    } else {
        &view.dist_policy
    };
    Some(format!(
        "\n\nCREATE MATERIALIZED VIEW {fqn}{options}{tablespace} AS {body}\nWITH NO DATA\n{dist_policy};\n"
    ))
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_create_view(&mut self, view: &View, metadata: Option<&ObjectMetadata>) -> Result<()> {
        let Some(sql) = create_view_statement(view) else {
            gpdump_trace_skip!(view.object_type(), view.fqn());
            return Ok(());
        };
        self.emit(view.metadata_entry(), &sql)?;
        gpdump_trace_object!(view.object_type(), view.fqn());
        self.print_object_metadata(view, metadata, None)
    }
}
