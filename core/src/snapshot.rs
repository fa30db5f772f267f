//! Catalog snapshot input and the assembled entity model.
//!
//! A [`CatalogSnapshot`] is the JSON document of already-fetched catalog rows.
//! [`Catalog::from_snapshot`] folds the raw metadata, privilege, dependency and
//! statistics rows into the keyed maps the emitters consume.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::acl::{
    ColumnPrivilegeRow, MetadataMap, MetadataRow, construct_column_privileges_map,
    construct_metadata_map,
};
use crate::catalog::single_row;
use crate::ddl::{
    Aggregate, BaseType, Cast, Collation, CompositeType, Constraint, Conversion, DatabaseInfo,
    Domain, EnumType, Extension, ExternalPartition, ForeignDataWrapper, ForeignServer, Function,
    FunctionInfo, FunctionInfoMap, IndexDefinition, Operator, OperatorClass, OperatorFamily,
    ProceduralLanguage, Protocol, RangeType, ResourceGroup, ResourceQueue, Role, RoleMember,
    RuleDefinition, Schema, Sequence, SequenceOwner, SequenceOwnerMap, SessionGucs, ShellType,
    Table, Tablespace, TextSearchConfiguration, TextSearchDictionary, TextSearchParser,
    TextSearchTemplate, TriggerDefinition, UserMapping, View,
};
use crate::error::Result;
use crate::sortable::{
    DependencyMap, DependencyRow, OrderEntry, Sortable, construct_dependency_map, resolve_order,
    topological_sort,
};
use crate::statistics::{AttributeStatistic, AttributeStatisticMap, TupleStatistic, TupleStatisticMap};
use crate::utils::make_fqn;

/// Every row set one backup run reads from the catalog.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSnapshot {
    pub session_gucs: SessionGucs,
    pub database: Option<DatabaseInfo>,
    pub tablespaces: Vec<Tablespace>,
    pub resource_queues: Vec<ResourceQueue>,
    pub resource_groups: Vec<ResourceGroup>,
    pub roles: Vec<Role>,
    pub role_members: Vec<RoleMember>,
    pub schemas: Vec<Schema>,
    pub extensions: Vec<Extension>,
    pub procedural_languages: Vec<ProceduralLanguage>,
    pub shell_types: Vec<ShellType>,
    pub base_types: Vec<BaseType>,
    pub composite_types: Vec<CompositeType>,
    pub enum_types: Vec<EnumType>,
    pub domains: Vec<Domain>,
    pub range_types: Vec<RangeType>,
    pub collations: Vec<Collation>,
    pub functions: Vec<Function>,
    /// Every function referenced by oid, built-ins included
    pub function_info: Vec<FunctionInfo>,
    pub aggregates: Vec<Aggregate>,
    pub casts: Vec<Cast>,
    pub conversions: Vec<Conversion>,
    pub protocols: Vec<Protocol>,
    pub operators: Vec<Operator>,
    pub operator_families: Vec<OperatorFamily>,
    pub operator_classes: Vec<OperatorClass>,
    pub text_search_parsers: Vec<TextSearchParser>,
    pub text_search_templates: Vec<TextSearchTemplate>,
    pub text_search_dictionaries: Vec<TextSearchDictionary>,
    pub text_search_configurations: Vec<TextSearchConfiguration>,
    pub foreign_data_wrappers: Vec<ForeignDataWrapper>,
    pub foreign_servers: Vec<ForeignServer>,
    pub user_mappings: Vec<UserMapping>,
    pub tables: Vec<Table>,
    pub sequences: Vec<Sequence>,
    pub sequence_owners: Vec<SequenceOwner>,
    pub constraints: Vec<Constraint>,
    pub views: Vec<View>,
    pub indexes: Vec<IndexDefinition>,
    pub rules: Vec<RuleDefinition>,
    pub triggers: Vec<TriggerDefinition>,
    pub external_partitions: Vec<ExternalPartition>,
    pub metadata: Vec<MetadataRow>,
    pub column_privileges: Vec<ColumnPrivilegeRow>,
    pub dependencies: Vec<DependencyRow>,
    /// Precomputed emission order; replaces the dependency sort when present
    pub order: Option<Vec<OrderEntry>>,
    pub tuple_statistics: Vec<TupleStatistic>,
    pub attribute_statistics: Vec<AttributeStatistic>,
}

impl CatalogSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Entity model for one run: the snapshot's objects plus the lookup maps
/// built from its auxiliary rows.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub objects: CatalogSnapshot,
    pub metadata: MetadataMap,
    pub functions: FunctionInfoMap,
    pub sequence_owners: SequenceOwnerMap,
    pub dependencies: DependencyMap,
    pub tuple_statistics: TupleStatisticMap,
    pub attribute_statistics: AttributeStatisticMap,
}

impl Catalog {
    pub fn from_snapshot(mut snapshot: CatalogSnapshot) -> Result<Self> {
        let metadata = construct_metadata_map(&snapshot.metadata)?;

        let mut column_privileges = construct_column_privileges_map(&snapshot.column_privileges)?;
        for table in &mut snapshot.tables {
            let Some(mut by_column) = column_privileges.remove(&table.oid()) else {
                continue;
            };
            for column in &mut table.def.column_defs {
                if let Some(acls) = by_column.remove(&column.name) {
                    column.privileges = Some(acls);
                }
            }
        }

        let mut functions: FunctionInfoMap = snapshot
            .function_info
            .iter()
            .map(|info| (info.oid, info.clone()))
            .collect();
        for function in &snapshot.functions {
            functions.entry(function.oid).or_insert_with(|| FunctionInfo {
                oid: function.oid,
                qualified_name: make_fqn(&function.schema, &function.name),
                arguments: function.ident_args.clone(),
                is_internal: false,
            });
        }

        let sequence_owners = snapshot
            .sequence_owners
            .iter()
            .map(|owner| (owner.sequence_fqn.clone(), owner.clone()))
            .collect();
        let dependencies = construct_dependency_map(&snapshot.dependencies);

        let mut tuple_rows: HashMap<u32, Vec<TupleStatistic>> = HashMap::new();
        for stat in &snapshot.tuple_statistics {
            tuple_rows.entry(stat.oid).or_default().push(stat.clone());
        }
        let mut tuple_statistics = TupleStatisticMap::new();
        for (oid, rows) in tuple_rows {
            if let Some(stat) = single_row("tuple statistics", rows)? {
                tuple_statistics.insert(oid, stat);
            }
        }

        let mut attribute_statistics = AttributeStatisticMap::new();
        for stat in &snapshot.attribute_statistics {
            attribute_statistics
                .entry(stat.oid)
                .or_default()
                .push(stat.clone());
        }
        for stats in attribute_statistics.values_mut() {
            stats.sort_by_key(|s| s.att_number);
        }

        Ok(Self {
            objects: snapshot,
            metadata,
            functions,
            sequence_owners,
            dependencies,
            tuple_statistics,
            attribute_statistics,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_snapshot(CatalogSnapshot::load(path)?)
    }

    /// Oids of the handler, inline and validator functions of the
    /// snapshot's procedural languages.
    pub fn language_function_oids(&self) -> HashSet<u32> {
        self.objects
            .procedural_languages
            .iter()
            .flat_map(ProceduralLanguage::support_functions)
            .collect()
    }

    /// Snapshot functions that back a procedural language; they are
    /// created ahead of the languages instead of in the sorted set.
    pub fn language_functions(&self) -> Vec<&Function> {
        let oids = self.language_function_oids();
        self.objects
            .functions
            .iter()
            .filter(|f| oids.contains(&f.oid))
            .collect()
    }

    /// Every sortable kind in a fixed order before sorting: foreign data
    /// wrappers and servers, functions, non-shell types, domains, the given
    /// tables, protocols, text search objects, conversions, operators,
    /// aggregates, casts.
    pub fn sortables<'a>(&'a self, tables: &'a [Table]) -> Vec<Sortable<'a>> {
        let objects = &self.objects;
        let language_functions = self.language_function_oids();
        objects
            .foreign_data_wrappers
            .iter()
            .map(Sortable::ForeignDataWrapper)
            .chain(objects.foreign_servers.iter().map(Sortable::ForeignServer))
            .chain(
                objects
                    .functions
                    .iter()
                    .filter(move |f| !language_functions.contains(&f.oid))
                    .map(Sortable::Function),
            )
            .chain(objects.base_types.iter().map(Sortable::BaseType))
            .chain(objects.composite_types.iter().map(Sortable::CompositeType))
            .chain(objects.enum_types.iter().map(Sortable::EnumType))
            .chain(objects.domains.iter().map(Sortable::Domain))
            .chain(objects.range_types.iter().map(Sortable::RangeType))
            .chain(tables.iter().map(Sortable::Table))
            .chain(objects.protocols.iter().map(Sortable::Protocol))
            .chain(objects.text_search_parsers.iter().map(Sortable::TextSearchParser))
            .chain(objects.text_search_templates.iter().map(Sortable::TextSearchTemplate))
            .chain(objects.text_search_dictionaries.iter().map(Sortable::TextSearchDictionary))
            .chain(
                objects
                    .text_search_configurations
                    .iter()
                    .map(Sortable::TextSearchConfiguration),
            )
            .chain(objects.conversions.iter().map(Sortable::Conversion))
            .chain(objects.operators.iter().map(Sortable::Operator))
            .chain(objects.operator_families.iter().map(Sortable::OperatorFamily))
            .chain(objects.operator_classes.iter().map(Sortable::OperatorClass))
            .chain(objects.aggregates.iter().map(Sortable::Aggregate))
            .chain(objects.casts.iter().map(Sortable::Cast))
            .collect()
    }

    /// The snapshot's precomputed order if it has one, otherwise a
    /// dependency sort of [`Catalog::sortables`].
    pub fn emission_order<'a>(&'a self, tables: &'a [Table]) -> Result<Vec<Sortable<'a>>> {
        let objects = self.sortables(tables);
        match &self.objects.order {
            Some(order) => resolve_order(order, &objects),
            None => topological_sort(&objects, &self.dependencies),
        }
    }

    /// Domain constraints grouped under their domain's FQN.
    pub fn domain_constraints(&self) -> HashMap<String, Vec<&Constraint>> {
        let mut by_domain: HashMap<String, Vec<&Constraint>> = HashMap::new();
        for constraint in self.objects.constraints.iter().filter(|c| c.is_domain_constraint) {
            by_domain
                .entry(constraint.owning_object.clone())
                .or_default()
                .push(constraint);
        }
        by_domain
    }

    /// FQNs of every table in the snapshot.
    pub fn table_fqns(&self) -> HashSet<String> {
        self.objects.tables.iter().map(|t| t.relation.fqn()).collect()
    }
}
