//! Planner statistics: `pg_class` tuple counts and `pg_statistic` rows,
//! rewritten so they restore by name into a database with different oids.

use std::collections::HashMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogCapabilities;
use crate::ddl::Table;
use crate::emit::Emitter;
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::{MetadataEntry, TocObject};
use crate::utils::escape_single_quotes;

/// `relpages`/`reltuples` of one table
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TupleStatistic {
    pub oid: u32,
    pub schema: String,
    pub table: String,
    pub rel_pages: i64,
    pub rel_tuples: f64,
}

/// One `pg_statistic` row. Slot vectors may be shorter than the slot count
/// of the target layout; missing slots print as zero/NULL.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeStatistic {
    /// Oid of the owning table
    pub oid: u32,
    pub schema: String,
    pub table: String,
    pub att_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub att_number: i32,
    pub inherit: bool,
    pub null_fraction: f64,
    pub width: i32,
    pub distinct: f64,
    pub kinds: Vec<i32>,
    pub operators: Vec<u32>,
    pub collations: Vec<u32>,
    pub numbers: Vec<Vec<String>>,
    pub values: Vec<Vec<String>>,
}

impl AttributeStatistic {
    /// `_name` is an array type; `__name` is a regular type with a leading
    /// underscore.
    pub fn is_array_type(&self) -> bool {
        let mut chars = self.type_name.chars();
        chars.next() == Some('_') && chars.next().is_some_and(|c| c != '_')
    }
}

pub type TupleStatisticMap = HashMap<u32, TupleStatistic>;
pub type AttributeStatisticMap = HashMap<u32, Vec<AttributeStatistic>>;

/// `'{"a","b"}'` with every element escaped for a single-quoted literal.
fn postgres_array(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("{:?}", escape_single_quotes(item)))
        .collect();
    format!("'{{{}}}'", quoted.join(","))
}

fn real_values(numbers: Option<&Vec<String>>) -> String {
    match numbers {
        Some(numbers) if !numbers.is_empty() => postgres_array(numbers),
        _ => "NULL".to_string(),
    }
}

/// Values go through `array_in` since not every type has an array type to
/// cast to.
fn any_values(values: Option<&Vec<String>>, type_name: &str) -> String {
    match values {
        Some(values) if !values.is_empty() => format!(
            "array_in({}, '{type_name}'::regtype::oid, -1)",
            postgres_array(values)
        ),
        _ => "NULL".to_string(),
    }
}

fn slot_columns(stat: &AttributeStatistic, caps: CatalogCapabilities) -> Vec<String> {
    let slots = caps.statistic_slots();
    let array = stat.is_array_type();
    let mut columns = Vec::with_capacity(slots * 5);

    for i in 0..slots {
        let kind = if array { 0 } else { stat.kinds.get(i).copied().unwrap_or(0) };
        columns.push(format!("{kind}::smallint"));
    }
    for i in 0..slots {
        let op = if array { 0 } else { stat.operators.get(i).copied().unwrap_or(0) };
        columns.push(format!("{op}::oid"));
    }
    if caps.has_stat_collations() {
        for i in 0..slots {
            let coll = if array { 0 } else { stat.collations.get(i).copied().unwrap_or(0) };
            columns.push(format!("{coll}::oid"));
        }
    }
    for i in 0..slots {
        let numbers = if array { None } else { stat.numbers.get(i) };
        columns.push(format!("{}::real[]", real_values(numbers)));
    }
    for i in 0..slots {
        let values = if array { None } else { stat.values.get(i) };
        columns.push(any_values(values, &stat.type_name));
    }
    columns
}

pub fn tuple_statistics_statement(table: &Table, stat: &TupleStatistic) -> String {
    format!(
        "UPDATE pg_class\nSET\n\trelpages = {}::int,\n\treltuples = {:.6}::real\nWHERE oid = '{}'::regclass::oid;",
        stat.rel_pages,
        stat.rel_tuples,
        escape_single_quotes(&table.fqn())
    )
}

/// DELETE then INSERT, since the row may or may not already exist.
pub fn attribute_statistics_statements(
    table: &Table,
    stat: &AttributeStatistic,
    caps: CatalogCapabilities,
) -> [String; 2] {
    let starelid = format!("'{}'::regclass::oid", escape_single_quotes(&table.fqn()));
    let inherit = if caps.has_stat_inherit() {
        format!("\n\t{}::boolean,", stat.inherit)
    } else {
        String::new()
    };
    [
        format!(
            "DELETE FROM pg_statistic WHERE starelid = {starelid} AND staattnum = {};",
            stat.att_number
        ),
        format!(
            "INSERT INTO pg_statistic VALUES (\n\t{starelid},\n\t{}::smallint,{inherit}\n\t{:.6}::real,\n\t{}::integer,\n\t{:.6}::real,\n\t{});",
            stat.att_number,
            stat.null_fraction,
            stat.width,
            stat.distinct,
            slot_columns(stat, caps).join(",\n\t")
        ),
    ]
}

impl<W: Write> Emitter<'_, W> {
    fn print_statistics_statement(&mut self, table: &Table, statement: &str) -> Result<()> {
        let entry = MetadataEntry::new(
            table.relation.schema.clone(),
            table.relation.name.clone(),
            "STATISTICS",
        );
        self.emit(entry, &format!("\n\n{statement}\n"))
    }

    /// Tuple counts then per-column statistics for each table, in table order.
    pub fn print_statistics(
        &mut self,
        tables: &[Table],
        tuple_stats: &TupleStatisticMap,
        attribute_stats: &AttributeStatisticMap,
    ) -> Result<()> {
        let caps = self.caps();
        for table in tables {
            let tuple = tuple_stats.get(&table.oid()).cloned().unwrap_or_default();
            self.print_statistics_statement(table, &tuple_statistics_statement(table, &tuple))?;
            for stat in attribute_stats.get(&table.oid()).into_iter().flatten() {
                for statement in attribute_statistics_statements(table, stat, caps) {
                    self.print_statistics_statement(table, &statement)?;
                }
            }
            gpdump_trace_object!("STATISTICS", table.fqn());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ddl::{Relation, TableDefinition};
    use crate::toc::Section;

    fn table() -> Table {
        Table::new(Relation::new(2200, 1, "public", "foo"), TableDefinition::default())
    }

    fn stat(type_name: &str) -> AttributeStatistic {
        AttributeStatistic {
            oid: 1,
            schema: "public".into(),
            table: "foo".into(),
            att_name: "bar".into(),
            type_name: type_name.into(),
            att_number: 3,
            inherit: false,
            null_fraction: 0.4,
            width: 10,
            distinct: 0.1,
            kinds: vec![20, 10, 30, 40, 50],
            operators: vec![201, 101, 301, 401, 501],
            collations: vec![100, 0, 0, 0, 0],
            numbers: vec![vec!["1".into(), "2".into(), "3".into()]],
            values: vec![vec!["4".into(), "5".into(), "6".into()]],
        }
    }

    #[test]
    fn test_tuple_statistics() {
        let tuple = TupleStatistic {
            oid: 1,
            rel_pages: 8,
            rel_tuples: 50.0,
            ..Default::default()
        };
        assert_eq!(
            tuple_statistics_statement(&table(), &tuple),
            "UPDATE pg_class\nSET\n\trelpages = 8::int,\n\treltuples = 50.000000::real\n\
             WHERE oid = 'public.foo'::regclass::oid;"
        );
    }

    #[test]
    fn test_attribute_statistics_five_slots() {
        let [delete, insert] =
            attribute_statistics_statements(&table(), &stat("int"), CatalogCapabilities::new(6));
        assert_eq!(
            delete,
            "DELETE FROM pg_statistic WHERE starelid = 'public.foo'::regclass::oid AND staattnum = 3;"
        );
        assert_eq!(
            insert,
            "INSERT INTO pg_statistic VALUES (\n\
             \t'public.foo'::regclass::oid,\n\
             \t3::smallint,\n\
             \tfalse::boolean,\n\
             \t0.400000::real,\n\
             \t10::integer,\n\
             \t0.100000::real,\n\
             \t20::smallint,\n\t10::smallint,\n\t30::smallint,\n\t40::smallint,\n\t50::smallint,\n\
             \t201::oid,\n\t101::oid,\n\t301::oid,\n\t401::oid,\n\t501::oid,\n\
             \t'{\"1\",\"2\",\"3\"}'::real[],\n\tNULL::real[],\n\tNULL::real[],\n\tNULL::real[],\n\tNULL::real[],\n\
             \tarray_in('{\"4\",\"5\",\"6\"}', 'int'::regtype::oid, -1),\n\tNULL,\n\tNULL,\n\tNULL,\n\tNULL);"
        );
    }

    #[test]
    fn test_attribute_statistics_four_slots_and_collations() {
        let [_, legacy] =
            attribute_statistics_statements(&table(), &stat("int"), CatalogCapabilities::new(5));
        assert!(!legacy.contains("::boolean"));
        assert!(!legacy.contains("50::smallint"));
        assert_eq!(legacy.matches("::smallint").count(), 5);

        let [_, modern] =
            attribute_statistics_statements(&table(), &stat("int"), CatalogCapabilities::new(7));
        assert!(modern.contains("\t501::oid,\n\t100::oid,\n\t0::oid"));
        assert_eq!(modern.matches("::oid").count(), 2 + 10);
    }

    #[test]
    fn test_array_type_statistics_are_zeroed() {
        assert!(stat("_int4").is_array_type());
        assert!(!stat("__int4").is_array_type());
        assert!(!stat("_").is_array_type());

        let [_, insert] =
            attribute_statistics_statements(&table(), &stat("_int4"), CatalogCapabilities::new(6));
        assert!(insert.contains("\t0::smallint,\n\t0::smallint"));
        assert!(!insert.contains("array_in"));
        assert!(insert.ends_with("\tNULL);"));
    }

    #[test]
    fn test_values_are_escaped() {
        let s = AttributeStatistic {
            values: vec![vec!["it's".into(), "say \"hi\"".into()]],
            ..stat("text")
        };
        let [_, insert] = attribute_statistics_statements(&table(), &s, CatalogCapabilities::new(6));
        assert!(insert.contains(r#"array_in('{"it''s","say \"hi\""}', 'text'::regtype::oid, -1)"#));
    }

    #[test]
    fn test_print_statistics_entries() {
        let tables = vec![table()];
        let tuples = TupleStatisticMap::new();
        let mut attributes = AttributeStatisticMap::new();
        attributes.insert(1, vec![stat("int")]);

        let mut entries = Vec::new();
        let mut emitter = Emitter::new(
            Vec::new(),
            &mut entries,
            Section::Statistics,
            CatalogCapabilities::default(),
        );
        emitter.print_statistics(&tables, &tuples, &attributes).unwrap();
        let total = emitter.byte_count();
        drop(emitter);

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.object_type == "STATISTICS" && e.name == "foo"));
        assert_eq!(entries[2].end_byte, total);
    }
}
