use gpdump_core::ddl::{
    Constraint, ExternalProtocol, ExternalTableDefinition, ExternalType, PartitionLevel, Relation,
    Sequence, Table, TableDefinition,
};
use gpdump_core::emit::{create_sequence_statement, order_constraints};
use gpdump_core::{
    CatalogCapabilities, Emitter, MetadataEntry, Privilege, Section, TableFilter,
    generate_table_batches, parse_acl, split_tables_by_partition_type,
};

fn sequence(last_val: i64, increment: i64, max_val: i64, min_val: i64, is_called: bool) -> Sequence {
    Sequence {
        relation: Relation::new(2200, 1, "public", "seq_name"),
        last_val,
        increment,
        max_val,
        min_val,
        cache_val: 1,
        is_called,
        ..Default::default()
    }
}

fn table(oid: u32, name: &str, level: PartitionLevel, root: &str) -> Table {
    Table::new(
        Relation::new(2200, oid, "public", name),
        TableDefinition {
            partition_level: level,
            partition_root: root.to_string(),
            ..Default::default()
        },
    )
}

fn external(location: &str, command: &str, writable: bool) -> ExternalTableDefinition {
    ExternalTableDefinition {
        location: location.to_string(),
        command: command.to_string(),
        writable,
        ..Default::default()
    }
}

#[test]
fn test_sentinel_bounds_are_suppressed() {
    let ascending = create_sequence_statement(&sequence(1, 1, i64::MAX, 1, true));
    assert!(ascending.contains("NO MAXVALUE"));
    assert!(ascending.contains("NO MINVALUE"));

    let descending = create_sequence_statement(&sequence(-1, -1, -1, -i64::MAX, true));
    assert!(descending.contains("NO MAXVALUE"));
    assert!(descending.contains("NO MINVALUE"));

    let bounded = create_sequence_statement(&sequence(1, 1, 100, 1, true));
    assert!(bounded.contains("MAXVALUE 100"));
    assert!(!bounded.contains("NO MAXVALUE"));
}

#[test]
fn test_start_with_follows_called_flag() {
    let fresh = create_sequence_statement(&sequence(5, 1, i64::MAX, 1, false));
    assert!(fresh.contains("\n\tSTART WITH 5\n"));
    assert!(fresh.contains("setval('public.seq_name', 5, false)"));

    let used = create_sequence_statement(&sequence(5, 1, i64::MAX, 1, true));
    assert!(!used.contains("START WITH"));
    assert!(used.contains("setval('public.seq_name', 5, true)"));
}

#[test]
fn test_external_classification() {
    let cases = [
        (external("file://host/data", "", false), ExternalType::Readable, ExternalProtocol::File),
        (external("file://host/data", "", true), ExternalType::Writable, ExternalProtocol::File),
        (external("http://host/data", "", false), ExternalType::ReadableWeb, ExternalProtocol::Http),
        (external("", "cat /tmp/x", true), ExternalType::WritableWeb, ExternalProtocol::Http),
        (external("s3://bucket/key", "", false), ExternalType::Readable, ExternalProtocol::S3),
    ];
    for (def, ext_type, protocol) in cases {
        assert_eq!(def.classify().unwrap(), (ext_type, protocol), "{def:?}");
    }
    assert!(external("ftp://host/data", "", false).classify().is_err());
}

#[test]
fn test_acl_parsing() {
    let plain = parse_acl("testrole=arwdDxt/gpadmin").unwrap().unwrap();
    assert!(plain.has(Privilege::Select) && plain.has(Privilege::Trigger));
    assert!(!plain.has_with_grant(Privilege::Select));

    let granted = parse_acl("testrole=a*D*x*t*X*U*C*T*c*/gpadmin").unwrap().unwrap();
    assert!(granted.has_with_grant(Privilege::Connect));
    assert!(!granted.has(Privilege::Insert));

    assert!(parse_acl("").unwrap().is_none());
}

#[test]
fn test_partition_split_with_leaf_data() {
    let tables = vec![
        table(1, "part_table", PartitionLevel::Parent, ""),
        table(2, "part_table_leaf1", PartitionLevel::Leaf, "public.part_table"),
        table(3, "part_table_leaf2", PartitionLevel::Leaf, "public.part_table"),
        table(4, "test_table", PartitionLevel::Unpartitioned, ""),
    ];
    let split = split_tables_by_partition_type(&tables, &TableFilter::default(), true);
    let names = |list: &[Table]| -> Vec<String> { list.iter().map(|t| t.relation.name.clone()).collect() };
    assert_eq!(names(&split.metadata), ["part_table", "test_table"]);
    assert_eq!(
        names(&split.data),
        ["part_table_leaf1", "part_table_leaf2", "test_table"]
    );
}

#[test]
fn test_foreign_keys_follow_other_constraints() {
    let constraint = |name: &str, con_type: &str| Constraint {
        name: name.to_string(),
        con_type: con_type.to_string(),
        def: Some(String::new()),
        owning_object: "public.t".to_string(),
        ..Default::default()
    };
    let constraints = vec![
        constraint("fk1", "f"),
        constraint("uniq", "u"),
        constraint("fk2", "f"),
        constraint("pk", "p"),
        constraint("chk", "c"),
    ];
    let ordered: Vec<&str> = order_constraints(&constraints)
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(ordered, ["uniq", "pk", "chk", "fk1", "fk2"]);
}

#[test]
fn test_toc_entries_are_contiguous() {
    let mut entries = Vec::new();
    let mut emitter = Emitter::new(
        Vec::new(),
        &mut entries,
        Section::Predata,
        CatalogCapabilities::default(),
    );
    for (name, text) in [("a", "\n\nCREATE SCHEMA a;\n"), ("b", ""), ("c", "\n\nCREATE SCHEMA c;\n")] {
        emitter.emit(MetadataEntry::new("", name, "SCHEMA"), text).unwrap();
    }
    let total = emitter.byte_count();
    drop(emitter);

    assert_eq!(entries[0].start_byte, 0);
    for pair in entries.windows(2) {
        assert_eq!(pair[0].end_byte, pair[1].start_byte);
    }
    assert_eq!(entries[2].end_byte, total);
}

#[test]
fn test_lock_batching() {
    let tables: Vec<Table> = (0..200)
        .map(|i| table(i, &format!("t{i}"), PartitionLevel::Unpartitioned, ""))
        .collect();
    assert_eq!(generate_table_batches(&tables, 100).len(), 2);

    let batches = generate_table_batches(&tables[..101], 50);
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[2], "public.t100");
}
