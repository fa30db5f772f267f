//! Global emission order for the schema-level objects of predata.
//!
//! Functions, types, domains, tables, operators, aggregates, casts, text
//! search objects and foreign servers can depend on each other in any
//! direction (a table column of a domain type over a base type whose I/O
//! functions are user-defined), so they are merged into one sequence. Uses
//! Kahn's algorithm; among ready objects the earliest in input order goes
//! first.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::acl::UniqueId;
use crate::ddl::{
    Aggregate, BaseType, Cast, CompositeType, Conversion, Domain, EnumType, ForeignDataWrapper,
    ForeignServer, Function, Operator, OperatorClass, OperatorFamily, Protocol, RangeType, Table,
    TextSearchConfiguration, TextSearchDictionary, TextSearchParser, TextSearchTemplate,
};
use crate::error::{DumpError, Result};
use crate::toc::TocObject;

/// Kind tag of an orderable object
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    #[serde(rename = "FUNCTION")]
    Function,
    #[serde(rename = "BASE TYPE")]
    BaseType,
    #[serde(rename = "COMPOSITE TYPE")]
    CompositeType,
    #[serde(rename = "ENUM TYPE")]
    EnumType,
    #[serde(rename = "DOMAIN")]
    Domain,
    #[serde(rename = "RANGE TYPE")]
    RangeType,
    #[serde(rename = "TABLE")]
    Table,
    #[serde(rename = "AGGREGATE")]
    Aggregate,
    #[serde(rename = "CAST")]
    Cast,
    #[serde(rename = "CONVERSION")]
    Conversion,
    #[serde(rename = "OPERATOR")]
    Operator,
    #[serde(rename = "OPERATOR FAMILY")]
    OperatorFamily,
    #[serde(rename = "OPERATOR CLASS")]
    OperatorClass,
    #[serde(rename = "TEXT SEARCH PARSER")]
    TextSearchParser,
    #[serde(rename = "TEXT SEARCH TEMPLATE")]
    TextSearchTemplate,
    #[serde(rename = "TEXT SEARCH DICTIONARY")]
    TextSearchDictionary,
    #[serde(rename = "TEXT SEARCH CONFIGURATION")]
    TextSearchConfiguration,
    #[serde(rename = "PROTOCOL")]
    Protocol,
    #[serde(rename = "FOREIGN DATA WRAPPER")]
    ForeignDataWrapper,
    #[serde(rename = "FOREIGN SERVER")]
    ForeignServer,
}

impl ObjectKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Function => "FUNCTION",
            ObjectKind::BaseType => "BASE TYPE",
            ObjectKind::CompositeType => "COMPOSITE TYPE",
            ObjectKind::EnumType => "ENUM TYPE",
            ObjectKind::Domain => "DOMAIN",
            ObjectKind::RangeType => "RANGE TYPE",
            ObjectKind::Table => "TABLE",
            ObjectKind::Aggregate => "AGGREGATE",
            ObjectKind::Cast => "CAST",
            ObjectKind::Conversion => "CONVERSION",
            ObjectKind::Operator => "OPERATOR",
            ObjectKind::OperatorFamily => "OPERATOR FAMILY",
            ObjectKind::OperatorClass => "OPERATOR CLASS",
            ObjectKind::TextSearchParser => "TEXT SEARCH PARSER",
            ObjectKind::TextSearchTemplate => "TEXT SEARCH TEMPLATE",
            ObjectKind::TextSearchDictionary => "TEXT SEARCH DICTIONARY",
            ObjectKind::TextSearchConfiguration => "TEXT SEARCH CONFIGURATION",
            ObjectKind::Protocol => "PROTOCOL",
            ObjectKind::ForeignDataWrapper => "FOREIGN DATA WRAPPER",
            ObjectKind::ForeignServer => "FOREIGN SERVER",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "FUNCTION" => ObjectKind::Function,
            "BASE TYPE" => ObjectKind::BaseType,
            "COMPOSITE TYPE" => ObjectKind::CompositeType,
            "ENUM TYPE" => ObjectKind::EnumType,
            "DOMAIN" => ObjectKind::Domain,
            "RANGE TYPE" => ObjectKind::RangeType,
            "TABLE" => ObjectKind::Table,
            "AGGREGATE" => ObjectKind::Aggregate,
            "CAST" => ObjectKind::Cast,
            "CONVERSION" => ObjectKind::Conversion,
            "OPERATOR" => ObjectKind::Operator,
            "OPERATOR FAMILY" => ObjectKind::OperatorFamily,
            "OPERATOR CLASS" => ObjectKind::OperatorClass,
            "TEXT SEARCH PARSER" => ObjectKind::TextSearchParser,
            "TEXT SEARCH TEMPLATE" => ObjectKind::TextSearchTemplate,
            "TEXT SEARCH DICTIONARY" => ObjectKind::TextSearchDictionary,
            "TEXT SEARCH CONFIGURATION" => ObjectKind::TextSearchConfiguration,
            "PROTOCOL" => ObjectKind::Protocol,
            "FOREIGN DATA WRAPPER" => ObjectKind::ForeignDataWrapper,
            "FOREIGN SERVER" => ObjectKind::ForeignServer,
            other => return Err(DumpError::UnknownObjectKind(other.to_string())),
        })
    }
}

/// One object taking part in the global order, borrowed from the snapshot.
#[derive(Clone, Copy, Debug)]
pub enum Sortable<'a> {
    Function(&'a Function),
    BaseType(&'a BaseType),
    CompositeType(&'a CompositeType),
    EnumType(&'a EnumType),
    Domain(&'a Domain),
    RangeType(&'a RangeType),
    Table(&'a Table),
    Aggregate(&'a Aggregate),
    Cast(&'a Cast),
    Conversion(&'a Conversion),
    Operator(&'a Operator),
    OperatorFamily(&'a OperatorFamily),
    OperatorClass(&'a OperatorClass),
    TextSearchParser(&'a TextSearchParser),
    TextSearchTemplate(&'a TextSearchTemplate),
    TextSearchDictionary(&'a TextSearchDictionary),
    TextSearchConfiguration(&'a TextSearchConfiguration),
    Protocol(&'a Protocol),
    ForeignDataWrapper(&'a ForeignDataWrapper),
    ForeignServer(&'a ForeignServer),
}

impl Sortable<'_> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Sortable::Function(_) => ObjectKind::Function,
            Sortable::BaseType(_) => ObjectKind::BaseType,
            Sortable::CompositeType(_) => ObjectKind::CompositeType,
            Sortable::EnumType(_) => ObjectKind::EnumType,
            Sortable::Domain(_) => ObjectKind::Domain,
            Sortable::RangeType(_) => ObjectKind::RangeType,
            Sortable::Table(_) => ObjectKind::Table,
            Sortable::Aggregate(_) => ObjectKind::Aggregate,
            Sortable::Cast(_) => ObjectKind::Cast,
            Sortable::Conversion(_) => ObjectKind::Conversion,
            Sortable::Operator(_) => ObjectKind::Operator,
            Sortable::OperatorFamily(_) => ObjectKind::OperatorFamily,
            Sortable::OperatorClass(_) => ObjectKind::OperatorClass,
            Sortable::TextSearchParser(_) => ObjectKind::TextSearchParser,
            Sortable::TextSearchTemplate(_) => ObjectKind::TextSearchTemplate,
            Sortable::TextSearchDictionary(_) => ObjectKind::TextSearchDictionary,
            Sortable::TextSearchConfiguration(_) => ObjectKind::TextSearchConfiguration,
            Sortable::Protocol(_) => ObjectKind::Protocol,
            Sortable::ForeignDataWrapper(_) => ObjectKind::ForeignDataWrapper,
            Sortable::ForeignServer(_) => ObjectKind::ForeignServer,
        }
    }

    pub fn unique_id(&self) -> UniqueId {
        match self {
            Sortable::Function(o) => o.unique_id(),
            Sortable::BaseType(o) => o.unique_id(),
            Sortable::CompositeType(o) => o.unique_id(),
            Sortable::EnumType(o) => o.unique_id(),
            Sortable::Domain(o) => o.unique_id(),
            Sortable::RangeType(o) => o.unique_id(),
            Sortable::Table(o) => o.unique_id(),
            Sortable::Aggregate(o) => o.unique_id(),
            Sortable::Cast(o) => o.unique_id(),
            Sortable::Conversion(o) => o.unique_id(),
            Sortable::Operator(o) => o.unique_id(),
            Sortable::OperatorFamily(o) => o.unique_id(),
            Sortable::OperatorClass(o) => o.unique_id(),
            Sortable::TextSearchParser(o) => o.unique_id(),
            Sortable::TextSearchTemplate(o) => o.unique_id(),
            Sortable::TextSearchDictionary(o) => o.unique_id(),
            Sortable::TextSearchConfiguration(o) => o.unique_id(),
            Sortable::Protocol(o) => o.unique_id(),
            Sortable::ForeignDataWrapper(o) => o.unique_id(),
            Sortable::ForeignServer(o) => o.unique_id(),
        }
    }

    pub fn as_toc_object(&self) -> &dyn TocObject {
        match self {
            Sortable::Function(o) => *o,
            Sortable::BaseType(o) => *o,
            Sortable::CompositeType(o) => *o,
            Sortable::EnumType(o) => *o,
            Sortable::Domain(o) => *o,
            Sortable::RangeType(o) => *o,
            Sortable::Table(o) => *o,
            Sortable::Aggregate(o) => *o,
            Sortable::Cast(o) => *o,
            Sortable::Conversion(o) => *o,
            Sortable::Operator(o) => *o,
            Sortable::OperatorFamily(o) => *o,
            Sortable::OperatorClass(o) => *o,
            Sortable::TextSearchParser(o) => *o,
            Sortable::TextSearchTemplate(o) => *o,
            Sortable::TextSearchDictionary(o) => *o,
            Sortable::TextSearchConfiguration(o) => *o,
            Sortable::Protocol(o) => *o,
            Sortable::ForeignDataWrapper(o) => *o,
            Sortable::ForeignServer(o) => *o,
        }
    }

    pub fn fqn(&self) -> String {
        self.as_toc_object().fqn()
    }
}

/// `pg_depend` style edge: `(class_id, oid)` depends on `(ref_class_id, ref_oid)`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyRow {
    pub class_id: u32,
    pub oid: u32,
    pub ref_class_id: u32,
    pub ref_oid: u32,
}

/// Object → objects it depends on
pub type DependencyMap = HashMap<UniqueId, HashSet<UniqueId>>;

pub fn construct_dependency_map(rows: &[DependencyRow]) -> DependencyMap {
    let mut map = DependencyMap::new();
    for row in rows {
        map.entry(UniqueId::new(row.class_id, row.oid))
            .or_default()
            .insert(UniqueId::new(row.ref_class_id, row.ref_oid));
    }
    map
}

/// Order `objects` so every object follows the objects it depends on.
///
/// Dependencies on objects outside the set (built-ins, schemas, objects
/// emitted in an earlier phase) are ignored, as are self-references. An
/// input that already respects its dependencies comes back unchanged. A cycle is a
/// [`DumpError::DependencySort`] carrying the number of unordered objects.
pub fn topological_sort<'a>(objects: &[Sortable<'a>], dependencies: &DependencyMap) -> Result<Vec<Sortable<'a>>> {
    let index: HashMap<UniqueId, usize> = objects
        .iter()
        .enumerate()
        .map(|(i, obj)| (obj.unique_id(), i))
        .collect();

    let mut in_degree = vec![0usize; objects.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); objects.len()];
    for (i, obj) in objects.iter().enumerate() {
        let Some(deps) = dependencies.get(&obj.unique_id()) else {
            continue;
        };
        let mut targets: Vec<usize> = deps
            .iter()
            .filter_map(|dep| index.get(dep).copied())
            .filter(|&j| j != i)
            .collect();
        targets.sort_unstable();
        targets.dedup();
        for j in targets {
            in_degree[i] += 1;
            dependents[j].push(i);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..objects.len())
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();
    let mut sorted = Vec::with_capacity(objects.len());
    while let Some(Reverse(i)) = ready.pop() {
        sorted.push(objects[i]);
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if sorted.len() != objects.len() {
        return Err(DumpError::DependencySort(objects.len() - sorted.len()));
    }
    Ok(sorted)
}

/// One element of a precomputed emission order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub kind: String,
    pub oid: u32,
}

/// Resolve a precomputed order against the available objects.
///
/// Every kind tag must be known; entries naming an object that is not in
/// `objects` (filtered out upstream) are dropped.
pub fn resolve_order<'a>(order: &[OrderEntry], objects: &[Sortable<'a>]) -> Result<Vec<Sortable<'a>>> {
    let by_key: HashMap<(ObjectKind, u32), Sortable<'a>> = objects
        .iter()
        .map(|obj| ((obj.kind(), obj.unique_id().oid), *obj))
        .collect();
    let mut resolved = Vec::with_capacity(order.len());
    for entry in order {
        let kind: ObjectKind = entry.kind.parse()?;
        if let Some(obj) = by_key.get(&(kind, entry.oid)) {
            resolved.push(*obj);
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::class;
    use crate::ddl::{Relation, TableDefinition};

    fn function(oid: u32, name: &str) -> Function {
        Function {
            oid,
            schema: "public".into(),
            name: name.into(),
            ..Default::default()
        }
    }

    fn domain(oid: u32, name: &str) -> Domain {
        Domain {
            oid,
            schema: "public".into(),
            name: name.into(),
            base_type: "integer".into(),
            ..Default::default()
        }
    }

    fn table(oid: u32, name: &str) -> Table {
        Table::new(Relation::new(2200, oid, "public", name), TableDefinition::default())
    }

    fn dep(class_id: u32, oid: u32, ref_class_id: u32, ref_oid: u32) -> DependencyRow {
        DependencyRow {
            class_id,
            oid,
            ref_class_id,
            ref_oid,
        }
    }

    fn names(sorted: &[Sortable<'_>]) -> Vec<String> {
        sorted.iter().map(Sortable::fqn).collect()
    }

    #[test]
    fn test_cross_kind_dependencies() {
        let t = table(30, "t");
        let d = domain(20, "d");
        let f = function(10, "f");
        let objects = [Sortable::Table(&t), Sortable::Domain(&d), Sortable::Function(&f)];
        // table uses domain, domain check calls function
        let deps = construct_dependency_map(&[
            dep(class::PG_CLASS, 30, class::PG_TYPE, 20),
            dep(class::PG_TYPE, 20, class::PG_PROC, 10),
        ]);
        let sorted = topological_sort(&objects, &deps).unwrap();
        assert_eq!(names(&sorted), ["public.f()", "public.d", "public.t"]);
    }

    #[test]
    fn test_independent_objects_keep_input_order() {
        let a = table(1, "a");
        let b = table(2, "b");
        let f = function(3, "f");
        let objects = [Sortable::Table(&b), Sortable::Function(&f), Sortable::Table(&a)];
        let deps = construct_dependency_map(&[
            // outside the set and self references are ignored
            dep(class::PG_CLASS, 2, class::PG_NAMESPACE, 2200),
            dep(class::PG_CLASS, 1, class::PG_CLASS, 1),
        ]);
        let sorted = topological_sort(&objects, &deps).unwrap();
        assert_eq!(names(&sorted), ["public.b", "public.f()", "public.a"]);
    }

    #[test]
    fn test_operator_objects_follow_their_functions() {
        let f = function(10, "int_eq");
        let op = Operator {
            oid: 20,
            schema: "public".into(),
            name: "===".into(),
            procedure: "public.int_eq".into(),
            left_arg_type: "integer".into(),
            right_arg_type: "integer".into(),
            ..Default::default()
        };
        let cast = Cast {
            oid: 30,
            source_type_fqn: "integer".into(),
            target_type_fqn: "public.posint".into(),
            function_schema: "public".into(),
            function_name: "int_eq".into(),
            cast_method: "f".into(),
            ..Default::default()
        };
        let objects = [Sortable::Cast(&cast), Sortable::Operator(&op), Sortable::Function(&f)];
        let deps = construct_dependency_map(&[
            dep(class::PG_OPERATOR, 20, class::PG_PROC, 10),
            dep(class::PG_CAST, 30, class::PG_PROC, 10),
        ]);
        let sorted = topological_sort(&objects, &deps).unwrap();
        let kinds: Vec<ObjectKind> = sorted.iter().map(Sortable::kind).collect();
        assert_eq!(kinds, [ObjectKind::Function, ObjectKind::Cast, ObjectKind::Operator]);
    }

    #[test]
    fn test_cycle_is_an_error() {
        let a = function(1, "a");
        let b = function(2, "b");
        let c = function(3, "c");
        let objects = [Sortable::Function(&a), Sortable::Function(&b), Sortable::Function(&c)];
        let deps = construct_dependency_map(&[
            dep(class::PG_PROC, 1, class::PG_PROC, 2),
            dep(class::PG_PROC, 2, class::PG_PROC, 1),
        ]);
        let err = topological_sort(&objects, &deps).unwrap_err();
        assert!(matches!(err, DumpError::DependencySort(2)));
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!("RANGE TYPE".parse::<ObjectKind>().unwrap(), ObjectKind::RangeType);
        assert_eq!(ObjectKind::CompositeType.to_string(), "COMPOSITE TYPE");
        assert_eq!(
            "TEXT SEARCH CONFIGURATION".parse::<ObjectKind>().unwrap(),
            ObjectKind::TextSearchConfiguration
        );
        assert_eq!(ObjectKind::OperatorClass.as_str(), "OPERATOR CLASS");
        assert!(matches!(
            "RESOURCE QUEUE".parse::<ObjectKind>(),
            Err(DumpError::UnknownObjectKind(tag)) if tag == "RESOURCE QUEUE"
        ));
    }

    #[test]
    fn test_resolve_order() {
        let t = table(5, "t");
        let f = function(5, "f");
        let objects = [Sortable::Table(&t), Sortable::Function(&f)];
        let order = vec![
            OrderEntry {
                kind: "FUNCTION".into(),
                oid: 5,
            },
            OrderEntry {
                kind: "TABLE".into(),
                oid: 99,
            },
            OrderEntry {
                kind: "TABLE".into(),
                oid: 5,
            },
        ];
        let resolved = resolve_order(&order, &objects).unwrap();
        assert_eq!(names(&resolved), ["public.f()", "public.t"]);

        let bad = vec![OrderEntry {
            kind: "INDEX".into(),
            oid: 1,
        }];
        assert!(resolve_order(&bad, &objects).is_err());
    }
}
