use std::path::{Path, PathBuf};

use gpdump_core::backup::{GLOBAL_FILE, POSTDATA_FILE, PREDATA_FILE, STATISTICS_FILE};
use gpdump_core::{BackupOptions, Catalog, MetadataEntry, Section, Toc, run_backup};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/snapshot.json")
}

fn catalog() -> Catalog {
    Catalog::load(&fixture_path()).unwrap()
}

fn backup(opts: &BackupOptions) -> (tempfile::TempDir, Toc) {
    let dir = tempfile::tempdir().unwrap();
    let toc = run_backup(&catalog(), opts, dir.path()).unwrap();
    (dir, toc)
}

fn read(dir: &tempfile::TempDir, file: &str) -> String {
    std::fs::read_to_string(dir.path().join(file)).unwrap()
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
}

fn assert_contiguous(entries: &[MetadataEntry], len: usize) {
    let mut expected_start = 0;
    for entry in entries {
        assert_eq!(entry.start_byte, expected_start, "gap before {entry:?}");
        assert!(entry.end_byte >= entry.start_byte);
        expected_start = entry.end_byte;
    }
    assert_eq!(expected_start, len as u64);
}

#[test]
fn test_predata_follows_creation_order() {
    let (dir, _) = backup(&BackupOptions::default());
    let predata = read(&dir, PREDATA_FILE);

    let order = [
        "CREATE SCHEMA sales;",
        "COMMENT ON SCHEMA sales IS 'order data';",
        "CREATE EXTENSION IF NOT EXISTS hstore WITH SCHEMA public;",
        "CREATE PROCEDURAL LANGUAGE plpythonu;\nALTER FUNCTION pg_catalog.plpython_call_handler() OWNER TO gpadmin;",
        "CREATE SEQUENCE public.customers_id_seq",
        "CREATE FUNCTION sales.add_one(integer) RETURNS integer AS",
        "CREATE DOMAIN sales.positive_int AS integer",
        "CREATE TABLE sales.orders (",
        "CREATE READABLE EXTERNAL TABLE sales.orders_1_prt_2_ext_part_ (",
        "CREATE TABLE public.customers (",
        "CREATE OPERATOR sales.+++ (\n\tPROCEDURE = sales.add_one,\n\tRIGHTARG = integer\n);",
        "CREATE AGGREGATE sales.chain_add(integer) (\n\tSFUNC = sales.add_one,\n\tSTYPE = integer,\n\tINITCOND = '0'\n);",
        "CREATE CAST (sales.positive_int AS text)\n\tWITH INOUT\nAS ASSIGNMENT;",
        "ALTER TABLE sales.orders EXCHANGE PARTITION FOR (RANK(2)) WITH TABLE sales.orders_1_prt_2_ext_part_ WITHOUT VALIDATION;",
        "ALTER TABLE ONLY public.customers ADD CONSTRAINT customers_pkey PRIMARY KEY (id);",
        "ALTER TABLE sales.orders ADD CONSTRAINT orders_customer_fk FOREIGN KEY",
        "ALTER SEQUENCE public.customers_id_seq OWNED BY public.customers.id;",
        "CREATE VIEW sales.big_orders AS SELECT",
    ];
    let positions: Vec<usize> = order.iter().map(|s| position(&predata, s)).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "out of order: {positions:?}"
    );

    assert!(!predata.contains("CREATE SCHEMA public"));
    assert!(!predata.contains("legacy"));
    assert!(predata.contains("\tCONSTRAINT positive_int_check CHECK (VALUE > 0)"));
    assert!(predata.contains("COMMENT ON COLUMN public.customers.name IS 'display name';"));
    assert!(predata.contains("GRANT SELECT (name) ON TABLE public.customers TO reporting;"));
    assert!(predata.contains("GRANT SELECT ON TABLE public.customers TO reporting;"));
}

#[test]
fn test_toc_ranges_cover_each_section_file() {
    let (dir, toc) = backup(&BackupOptions {
        with_stats: true,
        ..Default::default()
    });

    for (section, file) in [
        (Section::Global, GLOBAL_FILE),
        (Section::Predata, PREDATA_FILE),
        (Section::Postdata, POSTDATA_FILE),
        (Section::Statistics, STATISTICS_FILE),
    ] {
        let contents = read(&dir, file);
        let entries = toc.entries(section);
        assert!(!entries.is_empty(), "{section} has no entries");
        assert_contiguous(entries, contents.len());
    }
}

#[test]
fn test_global_section_order() {
    let (dir, toc) = backup(&BackupOptions::default());
    let global = read(&dir, GLOBAL_FILE);

    assert!(global.starts_with("SET statement_timeout = 0;\n"));
    let order = [
        "SET client_encoding = 'UTF8';",
        "ALTER RESOURCE QUEUE pg_default WITH (ACTIVE_STATEMENTS=20);",
        "CREATE RESOURCE QUEUE etl_queue WITH (ACTIVE_STATEMENTS=5, PRIORITY=HIGH);",
        "CREATE ROLE reporting;\nALTER ROLE reporting WITH NOSUPERUSER INHERIT NOCREATEROLE NOCREATEDB NOLOGIN RESOURCE QUEUE etl_queue;",
        "CREATE ROLE analyst;\nALTER ROLE analyst WITH NOSUPERUSER INHERIT NOCREATEROLE NOCREATEDB LOGIN;",
        "GRANT reporting TO analyst GRANTED BY gpadmin;",
        "CREATE TABLESPACE fastspace LOCATION '/data/fast';",
        "CREATE DATABASE warehouse TEMPLATE template0 ENCODING 'UTF8';",
        "COMMENT ON DATABASE warehouse IS 'sales warehouse';",
        "ALTER DATABASE warehouse OWNER TO gpadmin;",
        "ALTER DATABASE warehouse SET search_path TO sales, public;",
    ];
    let positions: Vec<usize> = order.iter().map(|s| position(&global, s)).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "out of order: {positions:?}"
    );

    let types: Vec<&str> = toc
        .entries(Section::Global)
        .iter()
        .map(|e| e.object_type.as_str())
        .collect();
    assert_eq!(types.first(), Some(&"SESSION GUCS"));
    assert_eq!(types.last(), Some(&"DATABASE GUC"));
    assert!(!read(&dir, PREDATA_FILE).contains("CREATE ROLE"));
}

#[test]
fn test_globals_can_be_skipped() {
    let (dir, toc) = backup(&BackupOptions {
        without_globals: true,
        ..Default::default()
    });
    assert!(!dir.path().join(GLOBAL_FILE).exists());
    assert!(toc.entries(Section::Global).is_empty());
    assert!(!toc.entries(Section::Predata).is_empty());
}

#[test]
fn test_toc_entry_extracts_one_object() {
    let (dir, toc) = backup(&BackupOptions::default());
    let predata = read(&dir, PREDATA_FILE);

    let entry = toc
        .entries(Section::Predata)
        .iter()
        .find(|e| e.object_type == "VIEW")
        .unwrap();
    let text = &predata[entry.start_byte as usize..entry.end_byte as usize];
    assert_eq!(
        text,
        "\n\nCREATE VIEW sales.big_orders AS SELECT id, amount FROM sales.orders WHERE amount > 100;\n"
    );
}

#[test]
fn test_postdata_indexes() {
    let (dir, toc) = backup(&BackupOptions::default());
    let postdata = read(&dir, POSTDATA_FILE);
    assert_eq!(
        postdata,
        "\n\nCREATE INDEX customers_name_idx ON public.customers USING btree (name);\
         \n\nCREATE INDEX orders_amount_idx ON sales.orders USING btree (amount);"
    );
    let references: Vec<&str> = toc
        .entries(Section::Postdata)
        .iter()
        .map(|e| e.reference_object.as_str())
        .collect();
    assert_eq!(references, ["public.customers", "sales.orders"]);
}

#[test]
fn test_data_entries_by_partition_mode() {
    let names = |toc: &Toc| -> Vec<String> { toc.data_entries.iter().map(|e| e.name.clone()).collect() };

    let (_dir, toc) = backup(&BackupOptions::default());
    assert_eq!(names(&toc), ["orders", "customers"]);
    assert_eq!(toc.data_entries[1].attribute_string, "(id,name)");

    let (_dir, toc) = backup(&BackupOptions {
        leaf_partition_data: true,
        ..Default::default()
    });
    assert_eq!(names(&toc), ["orders_1_prt_1", "customers"]);
    assert_eq!(toc.data_entries[0].partition_root, "sales.orders");
}

#[test]
fn test_include_filter_restricts_every_section() {
    let (dir, toc) = backup(&BackupOptions {
        include_tables: vec!["public.customers".into()],
        with_stats: true,
        ..Default::default()
    });
    let predata = read(&dir, PREDATA_FILE);
    assert!(predata.contains("CREATE TABLE public.customers ("));
    assert!(predata.contains("CREATE SEQUENCE public.customers_id_seq"));
    assert!(!predata.contains("CREATE TABLE sales.orders"));
    assert!(!predata.contains("orders_customer_fk"));
    assert!(!predata.contains("EXCHANGE PARTITION"));
    assert!(!predata.contains("CREATE VIEW"));

    let postdata = read(&dir, POSTDATA_FILE);
    assert!(!postdata.contains("orders_amount_idx"));

    let data: Vec<&str> = toc.data_entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(data, ["customers"]);
}

#[test]
fn test_statistics_section() {
    let (dir, toc) = backup(&BackupOptions {
        with_stats: true,
        ..Default::default()
    });
    let statistics = read(&dir, STATISTICS_FILE);
    assert!(statistics.contains("\trelpages = 4::int,\n\treltuples = 120.000000::real\nWHERE oid = 'public.customers'::regclass::oid;"));
    assert!(statistics.contains(
        "DELETE FROM pg_statistic WHERE starelid = 'public.customers'::regclass::oid AND staattnum = 1;"
    ));
    assert!(statistics.contains("array_in('{\"1\",\"60\",\"120\"}', 'int4'::regtype::oid, -1)"));
    assert!(toc
        .entries(Section::Statistics)
        .iter()
        .all(|e| e.object_type == "STATISTICS"));
}

#[test]
fn test_statistics_skipped_by_default() {
    let (dir, toc) = backup(&BackupOptions::default());
    assert!(!dir.path().join(STATISTICS_FILE).exists());
    assert!(toc.entries(Section::Statistics).is_empty());
}
