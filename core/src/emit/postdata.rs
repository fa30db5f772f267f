use std::io::Write;

use super::Emitter;
use crate::acl::MetadataMap;
use crate::ddl::{IndexDefinition, RuleDefinition, TriggerDefinition};
use crate::error::Result;
use crate::toc::TocObject;
use crate::{gpdump_trace_object, gpdump_trace_skip};

impl<W: Write> Emitter<'_, W> {
    /// Indexes backing a constraint are created by that constraint and only
    /// get their metadata block here.
    pub fn print_create_indexes(&mut self, indexes: &[IndexDefinition], metadata: &MetadataMap) -> Result<()> {
        for index in indexes {
            if !index.supports_constraint {
                let Some(def) = &index.def else {
                    gpdump_trace_skip!("INDEX", index.fqn());
                    continue;
                };
                self.emit(index.metadata_entry(), &format!("\n\n{def};"))?;
                gpdump_trace_object!("INDEX", index.fqn());

                let mut followups = Vec::new();
                if !index.tablespace.is_empty() {
                    followups.push(format!(
                        "\nALTER INDEX {} SET TABLESPACE {};",
                        index.fqn(),
                        index.tablespace
                    ));
                }
                if index.is_clustered {
                    followups.push(format!(
                        "\nALTER TABLE {} CLUSTER ON {};",
                        index.owning_fqn(),
                        index.name
                    ));
                }
                for followup in followups {
                    let mut entry = index.metadata_entry().with_reference(index.fqn());
                    entry.object_type = "INDEX METADATA".to_string();
                    self.emit(entry, &followup)?;
                }
            }
            self.print_object_metadata(index, metadata.get(&index.unique_id()), None)?;
        }
        Ok(())
    }

    pub fn print_create_rules(&mut self, rules: &[RuleDefinition], metadata: &MetadataMap) -> Result<()> {
        for rule in rules {
            let Some(def) = &rule.def else {
                gpdump_trace_skip!("RULE", rule.name);
                continue;
            };
            self.emit(rule.metadata_entry(), &format!("\n\n{def}"))?;
            gpdump_trace_object!("RULE", rule.name);
            let owner = rule.owning_fqn();
            self.print_object_metadata(rule, metadata.get(&rule.unique_id()), Some(&owner))?;
        }
        Ok(())
    }

    pub fn print_create_triggers(&mut self, triggers: &[TriggerDefinition], metadata: &MetadataMap) -> Result<()> {
        for trigger in triggers {
            let Some(def) = &trigger.def else {
                gpdump_trace_skip!("TRIGGER", trigger.name);
                continue;
            };
            self.emit(trigger.metadata_entry(), &format!("\n\n{def};"))?;
            gpdump_trace_object!("TRIGGER", trigger.name);
            let owner = trigger.owning_fqn();
            self.print_object_metadata(trigger, metadata.get(&trigger.unique_id()), Some(&owner))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::ObjectMetadata;
    use crate::toc::{MetadataEntry, Section};

    fn index(name: &str) -> IndexDefinition {
        IndexDefinition {
            oid: 1,
            name: name.into(),
            owning_schema: "public".into(),
            owning_table: "testtable".into(),
            def: Some(format!("CREATE INDEX {name} ON public.testtable USING btree (i)")),
            ..Default::default()
        }
    }

    fn emit_postdata(f: impl FnOnce(&mut Emitter<'_, Vec<u8>>)) -> (String, Vec<MetadataEntry>) {
        let mut entries = Vec::new();
        let mut emitter = Emitter::new(Vec::new(), &mut entries, Section::Postdata, Default::default());
        f(&mut emitter);
        let out = String::from_utf8(emitter.finish().unwrap()).unwrap();
        (out, entries)
    }

    #[test]
    fn test_index_with_tablespace_and_cluster() {
        let idx = IndexDefinition {
            tablespace: "test_tablespace".into(),
            is_clustered: true,
            ..index("testindex")
        };
        let (out, entries) = emit_postdata(|e| {
            e.print_create_indexes(&[idx], &MetadataMap::new()).unwrap();
        });
        assert_eq!(
            out,
            "\n\nCREATE INDEX testindex ON public.testtable USING btree (i);\
             \nALTER INDEX public.testindex SET TABLESPACE test_tablespace;\
             \nALTER TABLE public.testtable CLUSTER ON testindex;"
        );
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].object_type, "INDEX");
        assert_eq!(entries[0].reference_object, "public.testtable");
        assert_eq!(entries[1].object_type, "INDEX METADATA");
        assert_eq!(entries[1].reference_object, "public.testindex");
        assert_eq!(entries[2].end_byte, out.len() as u64);
    }

    #[test]
    fn test_constraint_index_and_null_definitions_are_skipped() {
        let backing = IndexDefinition {
            supports_constraint: true,
            ..index("pk_index")
        };
        let missing = IndexDefinition {
            def: None,
            ..index("gone")
        };
        let (out, entries) = emit_postdata(|e| {
            e.print_create_indexes(&[backing, missing], &MetadataMap::new())
                .unwrap();
        });
        assert!(out.is_empty());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_rules_and_triggers() {
        let rule = RuleDefinition {
            oid: 2,
            name: "update_notify".into(),
            owning_schema: "public".into(),
            owning_table: "testtable".into(),
            def: Some("CREATE RULE update_notify AS ON UPDATE TO testtable DO NOTIFY testtable;".into()),
        };
        let trigger = TriggerDefinition {
            oid: 3,
            name: "sync_testtable".into(),
            owning_schema: "public".into(),
            owning_table: "testtable".into(),
            def: Some(
                "CREATE TRIGGER sync_testtable AFTER INSERT ON public.testtable FOR EACH STATEMENT EXECUTE PROCEDURE flatfile_update_trigger()"
                    .into(),
            ),
        };
        let mut metadata = MetadataMap::new();
        metadata.insert(
            trigger.unique_id(),
            ObjectMetadata {
                comment: "sync".into(),
                ..Default::default()
            },
        );
        let (out, entries) = emit_postdata(|e| {
            e.print_create_rules(std::slice::from_ref(&rule), &metadata).unwrap();
            e.print_create_triggers(std::slice::from_ref(&trigger), &metadata)
                .unwrap();
        });
        assert!(out.starts_with("\n\nCREATE RULE update_notify AS ON UPDATE TO testtable DO NOTIFY testtable;\n\nCREATE TRIGGER"));
        assert!(out.ends_with(
            "flatfile_update_trigger();\n\nCOMMENT ON TRIGGER sync_testtable ON public.testtable IS 'sync';\n"
        ));
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].object_type, "TRIGGER METADATA");
        assert_eq!(entries[2].reference_object, "sync_testtable");
    }
}
