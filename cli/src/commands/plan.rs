//! Plan command implementation
//!
//! Shows which tables get metadata, which get data, and the lock statements a
//! run would issue, without writing anything.

use gpdump_core::ddl::Table;
use gpdump_core::{BackupPlan, Catalog};

use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Run the plan command
pub fn run(config: &Config) -> Result<(), CliError> {
    let catalog = Catalog::load(config.snapshot_path()?)?;
    let plan = BackupPlan::new(&catalog, &config.backup);

    println!("{}", output::heading("Backup Plan"));
    println!();

    print_tables("Metadata", &plan.split.metadata);
    print_tables("Data", &plan.split.data);

    println!("  {}:", output::label("Locks"));
    if plan.lock_statements.is_empty() {
        println!("    {}", output::muted("(none)"));
    }
    for statement in &plan.lock_statements {
        println!("    {statement}");
    }

    Ok(())
}

fn print_tables(title: &str, tables: &[Table]) {
    println!("  {} ({}):", output::label(title), tables.len());
    if tables.is_empty() {
        println!("    {}", output::muted("(none)"));
    }
    for table in tables {
        let root = &table.def.partition_root;
        if root.is_empty() {
            println!("    {}", table.relation.fqn());
        } else {
            println!(
                "    {} {}",
                table.relation.fqn(),
                output::muted(&format!("-> {root}"))
            );
        }
    }
    println!();
}
