//! Backup command implementation
//!
//! Loads the catalog snapshot and writes every section file plus the TOC.

use gpdump_core::backup::{GLOBAL_FILE, POSTDATA_FILE, PREDATA_FILE, STATISTICS_FILE, TOC_FILE};
use gpdump_core::{Catalog, Section, run_backup};

use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// Run the backup command
pub fn run(config: &Config) -> Result<(), CliError> {
    let snapshot = config.snapshot_path()?;
    let out_dir = config.out_dir()?;

    if out_dir.join(TOC_FILE).exists() {
        return Err(CliError::OutputExists(out_dir.to_path_buf()));
    }

    println!("{}", output::heading("Backup"));
    println!();
    println!("  {}: {}", output::label("Snapshot"), snapshot.display());
    println!("  {}: {}", output::label("Output"), out_dir.display());
    if !config.backup.include_tables.is_empty() {
        println!(
            "  {}: {}",
            output::label("Tables"),
            config.backup.include_tables.join(", ")
        );
    }
    println!();

    let catalog = Catalog::load(snapshot)?;
    tracing::debug!(tables = catalog.objects.tables.len(), "snapshot loaded");
    let toc = run_backup(&catalog, &config.backup, out_dir)?;

    let mut files = Vec::new();
    if !config.backup.without_globals {
        files.push((Section::Global, GLOBAL_FILE));
    }
    files.extend([(Section::Predata, PREDATA_FILE), (Section::Postdata, POSTDATA_FILE)]);
    if config.backup.with_stats {
        files.push((Section::Statistics, STATISTICS_FILE));
    }
    for (section, file) in files {
        let entries = toc.entries(section);
        let bytes = entries.last().map_or(0, |e| e.end_byte);
        println!(
            "  {} {} {}",
            output::success("wrote"),
            file,
            output::muted(&format!("({} objects, {bytes} bytes)", entries.len()))
        );
    }
    println!(
        "  {} {} {}",
        output::success("wrote"),
        TOC_FILE,
        output::muted(&format!("({} data entries)", toc.data_entries.len()))
    );

    if toc.data_entries.is_empty() {
        println!();
        println!("  {}", output::warning("No tables selected for data."));
    }

    Ok(())
}
