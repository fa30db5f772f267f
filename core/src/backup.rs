//! Section drivers: which objects go into the global, predata, postdata and
//! statistics sections, in which order, and the data/lock plan for one run.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::BackupOptions;
use crate::ddl::{PartitionLevel, Table};
use crate::emit::Emitter;
use crate::error::Result;
use crate::gpdump_trace_section;
use crate::lock::lock_statements;
use crate::partition::{TableFilter, TableSplit, split_tables_by_partition_type};
use crate::snapshot::Catalog;
use crate::sortable::Sortable;
use crate::toc::{CoordinatorDataEntry, MetadataEntry, Section, Toc, TocObject};

pub const GLOBAL_FILE: &str = "global.sql";
pub const PREDATA_FILE: &str = "predata.sql";
pub const POSTDATA_FILE: &str = "postdata.sql";
pub const STATISTICS_FILE: &str = "statistics.sql";
pub const TOC_FILE: &str = "toc.json";

// =============================================================================
// Plan
// =============================================================================

/// Table lists and lock statements for one run.
#[derive(Clone, Debug, Default)]
pub struct BackupPlan {
    pub filter: TableFilter,
    pub split: TableSplit,
    /// Every selected table under its catalog name, in snapshot order
    pub selected: Vec<Table>,
    pub lock_statements: Vec<String>,
}

impl BackupPlan {
    pub fn new(catalog: &Catalog, opts: &BackupOptions) -> Self {
        let tables = &catalog.objects.tables;
        let filter = TableFilter::new(tables, &opts.include_tables);
        let split = split_tables_by_partition_type(tables, &filter, opts.leaf_partition_data);
        let selected: Vec<Table> = tables.iter().filter(|t| filter.matches(t)).cloned().collect();
        let lock_statements = lock_statements(&selected, opts.lock_batch_size);
        Self {
            filter,
            split,
            selected,
            lock_statements,
        }
    }

    /// One data entry per table whose rows are extracted.
    pub fn data_entries(&self) -> Vec<CoordinatorDataEntry> {
        self.split
            .data
            .iter()
            .map(|table| CoordinatorDataEntry {
                schema: table.relation.schema.clone(),
                name: table.relation.name.clone(),
                oid: table.oid(),
                attribute_string: table.attribute_string(),
                rows_copied: 0,
                partition_root: if table.def.partition_level == PartitionLevel::Leaf {
                    table.def.partition_root.clone()
                } else {
                    String::new()
                },
            })
            .collect()
    }

    /// Whether an object owned by `owning_fqn` belongs in this backup.
    ///
    /// Objects owned by something other than a snapshot table (domains,
    /// schemas) are always kept.
    pub fn keeps_owned_by(&self, all_tables: &HashSet<String>, owning_fqn: &str) -> bool {
        !self.filter.is_filtered()
            || !all_tables.contains(owning_fqn)
            || self.selected.iter().any(|t| t.relation.fqn() == owning_fqn)
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Write the global section.
///
/// Order: session settings, resource queues, resource groups, roles, role
/// grants, tablespaces, the database with its metadata and settings.
pub fn write_global<W: Write>(catalog: &Catalog, emitter: &mut Emitter<'_, W>) -> Result<()> {
    let objects = &catalog.objects;
    let metadata = &catalog.metadata;

    emitter.print_session_gucs(&objects.session_gucs)?;
    emitter.print_create_resource_queues(&objects.resource_queues, metadata)?;
    emitter.print_create_resource_groups(&objects.resource_groups, metadata)?;
    emitter.print_create_roles(&objects.roles, metadata)?;
    emitter.print_role_grants(&objects.role_members)?;
    emitter.print_create_tablespaces(&objects.tablespaces, metadata)?;
    if let Some(database) = &objects.database {
        emitter.print_create_database(database, metadata.get(&database.unique_id()))?;
    }

    gpdump_trace_section!(Section::Global, emitter.entry_count(), emitter.byte_count());
    Ok(())
}

/// Write the predata section.
///
/// Order: schemas, extensions, language support functions and languages,
/// shell types, collations, sequences, the dependency-ordered schema
/// objects, user mappings, external partition exchanges, constraints,
/// sequence ownership, views.
pub fn write_predata<W: Write>(catalog: &Catalog, plan: &BackupPlan, emitter: &mut Emitter<'_, W>) -> Result<()> {
    let objects = &catalog.objects;
    let metadata = &catalog.metadata;
    let functions = &catalog.functions;
    let all_tables = catalog.table_fqns();
    let filtered = plan.filter.is_filtered();

    emitter.print_create_schemas(&objects.schemas, metadata)?;
    emitter.print_create_extensions(&objects.extensions, metadata)?;

    for function in catalog.language_functions() {
        emitter.print_create_function(function, metadata.get(&function.unique_id()))?;
    }
    for language in &objects.procedural_languages {
        emitter.print_create_language(language, functions, metadata.get(&language.unique_id()))?;
    }

    for shell in &objects.shell_types {
        emitter.print_create_shell_type(shell)?;
    }
    for base in &objects.base_types {
        emitter.print_create_shell_type(base)?;
    }
    for range in &objects.range_types {
        emitter.print_create_shell_type(range)?;
    }

    for collation in &objects.collations {
        emitter.print_create_collation(collation, metadata.get(&collation.unique_id()))?;
    }

    let sequences: Vec<_> = objects
        .sequences
        .iter()
        .filter(|seq| {
            !filtered
                || plan.filter.names(&seq.fqn())
                || catalog
                    .sequence_owners
                    .get(&seq.fqn())
                    .is_some_and(|owner| plan.keeps_owned_by(&all_tables, &owner.owning_table))
        })
        .collect();
    for sequence in &sequences {
        emitter.print_create_sequence(sequence, metadata.get(&sequence.relation.unique_id()))?;
    }

    let domain_constraints = catalog.domain_constraints();
    for object in catalog.emission_order(&plan.split.metadata)? {
        match object {
            Sortable::Function(function) => {
                emitter.print_create_function(function, metadata.get(&function.unique_id()))?
            }
            Sortable::BaseType(base) => emitter.print_create_base_type(base, metadata.get(&base.unique_id()))?,
            Sortable::CompositeType(composite) => {
                emitter.print_create_composite_type(composite, metadata.get(&composite.unique_id()))?
            }
            Sortable::EnumType(enum_type) => {
                emitter.print_create_enum_type(enum_type, metadata.get(&enum_type.unique_id()))?
            }
            Sortable::Domain(domain) => {
                let constraints = domain_constraints
                    .get(&domain.fqn())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                emitter.print_create_domain(domain, constraints, metadata.get(&domain.unique_id()))?
            }
            Sortable::RangeType(range) => {
                emitter.print_create_range_type(range, metadata.get(&range.unique_id()))?
            }
            Sortable::Table(table) => emitter.print_create_table(table, metadata.get(&table.unique_id()))?,
            Sortable::Aggregate(aggregate) => {
                emitter.print_create_aggregate(aggregate, functions, metadata.get(&aggregate.unique_id()))?
            }
            Sortable::Cast(cast) => emitter.print_create_cast(cast, metadata.get(&cast.unique_id()))?,
            Sortable::Conversion(conversion) => {
                emitter.print_create_conversion(conversion, metadata.get(&conversion.unique_id()))?
            }
            Sortable::Operator(operator) => {
                emitter.print_create_operator(operator, metadata.get(&operator.unique_id()))?
            }
            Sortable::OperatorFamily(family) => {
                emitter.print_create_operator_family(family, metadata.get(&family.unique_id()))?
            }
            Sortable::OperatorClass(class) => {
                emitter.print_create_operator_class(class, metadata.get(&class.unique_id()))?
            }
            Sortable::TextSearchParser(parser) => {
                emitter.print_create_text_search_parser(parser, metadata.get(&parser.unique_id()))?
            }
            Sortable::TextSearchTemplate(template) => {
                emitter.print_create_text_search_template(template, metadata.get(&template.unique_id()))?
            }
            Sortable::TextSearchDictionary(dictionary) => emitter
                .print_create_text_search_dictionary(dictionary, metadata.get(&dictionary.unique_id()))?,
            Sortable::TextSearchConfiguration(config) => {
                emitter.print_create_text_search_configuration(config, metadata.get(&config.unique_id()))?
            }
            Sortable::Protocol(protocol) => {
                emitter.print_create_protocol(protocol, functions, metadata.get(&protocol.unique_id()))?
            }
            Sortable::ForeignDataWrapper(fdw) => {
                emitter.print_create_foreign_data_wrapper(fdw, functions, metadata.get(&fdw.unique_id()))?
            }
            Sortable::ForeignServer(server) => {
                emitter.print_create_foreign_server(server, metadata.get(&server.unique_id()))?
            }
        }
    }

    emitter.print_create_user_mappings(&objects.user_mappings)?;

    // External leaves were created under their suffixed name above
    for partition in &objects.external_partitions {
        if let Some(external) = plan.split.metadata.iter().find(|t| t.oid() == partition.oid) {
            emitter.print_exchange_partition(partition, &external.fqn())?;
        }
    }

    let constraints: Vec<_> = objects
        .constraints
        .iter()
        .filter(|c| plan.keeps_owned_by(&all_tables, &c.owning_object))
        .cloned()
        .collect();
    emitter.print_constraints(&constraints, metadata)?;

    for sequence in &sequences {
        if let Some(owner) = catalog.sequence_owners.get(&sequence.fqn())
            && plan.keeps_owned_by(&all_tables, &owner.owning_table)
        {
            emitter.print_alter_sequence_owner(sequence, owner)?;
        }
    }

    for view in objects
        .views
        .iter()
        .filter(|v| !filtered || plan.filter.names(&v.fqn()))
    {
        emitter.print_create_view(view, metadata.get(&view.unique_id()))?;
    }

    gpdump_trace_section!(Section::Predata, emitter.entry_count(), emitter.byte_count());
    Ok(())
}

/// Write the postdata section: indexes, rules, triggers.
pub fn write_postdata<W: Write>(catalog: &Catalog, plan: &BackupPlan, emitter: &mut Emitter<'_, W>) -> Result<()> {
    let objects = &catalog.objects;
    let all_tables = catalog.table_fqns();
    let keeps = |owning_fqn: String| plan.keeps_owned_by(&all_tables, &owning_fqn);

    let indexes: Vec<_> = objects
        .indexes
        .iter()
        .filter(|i| keeps(i.owning_fqn()))
        .cloned()
        .collect();
    let rules: Vec<_> = objects
        .rules
        .iter()
        .filter(|r| keeps(r.owning_fqn()))
        .cloned()
        .collect();
    let triggers: Vec<_> = objects
        .triggers
        .iter()
        .filter(|t| keeps(t.owning_fqn()))
        .cloned()
        .collect();

    emitter.print_create_indexes(&indexes, &catalog.metadata)?;
    emitter.print_create_rules(&rules, &catalog.metadata)?;
    emitter.print_create_triggers(&triggers, &catalog.metadata)?;

    gpdump_trace_section!(Section::Postdata, emitter.entry_count(), emitter.byte_count());
    Ok(())
}

/// Write planner statistics for every selected table that holds local rows.
pub fn write_statistics<W: Write>(catalog: &Catalog, plan: &BackupPlan, emitter: &mut Emitter<'_, W>) -> Result<()> {
    let tables: Vec<Table> = plan
        .selected
        .iter()
        .filter(|t| !t.is_external() && !t.is_foreign())
        .cloned()
        .collect();
    emitter.print_statistics(&tables, &catalog.tuple_statistics, &catalog.attribute_statistics)?;
    gpdump_trace_section!(Section::Statistics, emitter.entry_count(), emitter.byte_count());
    Ok(())
}

// =============================================================================
// Run
// =============================================================================

fn write_section_file(
    path: &Path,
    entries: &mut Vec<MetadataEntry>,
    section: Section,
    opts: &BackupOptions,
    write: impl FnOnce(&mut Emitter<'_, BufWriter<File>>) -> Result<()>,
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    let mut emitter = Emitter::new(file, entries, section, opts.caps());
    write(&mut emitter)?;
    emitter.finish()?;
    Ok(())
}

/// Write every section file and `toc.json` under `out_dir`.
///
/// Statistics run on their own thread with their own file and TOC list.
/// The global section is skipped when `opts.without_globals` is set.
pub fn run_backup(catalog: &Catalog, opts: &BackupOptions, out_dir: &Path) -> Result<Toc> {
    std::fs::create_dir_all(out_dir)?;
    let plan = BackupPlan::new(catalog, opts);

    let mut toc = Toc::new();
    let sections = toc.split_sections();
    std::thread::scope(|scope| -> Result<()> {
        let statistics = opts.with_stats.then(|| {
            let plan = &plan;
            scope.spawn(move || {
                write_section_file(
                    &out_dir.join(STATISTICS_FILE),
                    sections.statistics,
                    Section::Statistics,
                    opts,
                    |emitter| write_statistics(catalog, plan, emitter),
                )
            })
        });

        if !opts.without_globals {
            write_section_file(
                &out_dir.join(GLOBAL_FILE),
                sections.global,
                Section::Global,
                opts,
                |emitter| write_global(catalog, emitter),
            )?;
        }
        write_section_file(
            &out_dir.join(PREDATA_FILE),
            sections.predata,
            Section::Predata,
            opts,
            |emitter| write_predata(catalog, &plan, emitter),
        )?;
        write_section_file(
            &out_dir.join(POSTDATA_FILE),
            sections.postdata,
            Section::Postdata,
            opts,
            |emitter| write_postdata(catalog, &plan, emitter),
        )?;

        if let Some(handle) = statistics {
            handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        }
        Ok(())
    })?;

    for entry in plan.data_entries() {
        toc.add_data_entry(entry);
    }
    toc.save(&out_dir.join(TOC_FILE))?;
    Ok(toc)
}
