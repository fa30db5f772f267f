//! Toc command implementation
//!
//! Lists the entries of a written `toc.json`, section by section.

use std::path::Path;

use gpdump_core::{Section, Toc};

use crate::error::CliError;
use crate::output;

/// Run the toc command
pub fn run(path: &Path, section: Option<Section>) -> Result<(), CliError> {
    let toc = Toc::load(path)?;

    println!("{}", output::heading("Table of Contents"));
    println!();

    let sections: Vec<Section> = match section {
        Some(section) => vec![section],
        None => Section::ALL.to_vec(),
    };

    for section in sections {
        let entries = toc.entries(section);
        if entries.is_empty() {
            continue;
        }
        println!("  {} {} entries", output::section(section.as_str()), entries.len());
        for entry in entries {
            let name = if entry.schema.is_empty() {
                entry.name.clone()
            } else {
                format!("{}.{}", entry.schema, entry.name)
            };
            println!(
                "    {:<14} {} {}",
                entry.object_type,
                name,
                output::byte_range(entry.start_byte, entry.end_byte)
            );
        }
        println!();
    }

    if section.is_none() && !toc.data_entries.is_empty() {
        println!("  {} {} tables", output::section("data"), toc.data_entries.len());
        for entry in &toc.data_entries {
            println!(
                "    {}.{} {}",
                entry.schema,
                entry.name,
                output::muted(&entry.attribute_string)
            );
        }
    }

    Ok(())
}
