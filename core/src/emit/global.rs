use std::io::Write;

use super::Emitter;
use crate::acl::{MetadataMap, ObjectMetadata};
use crate::catalog::CatalogCapabilities;
use crate::ddl::{DatabaseInfo, ResourceGroup, ResourceQueue, Role, RoleMember, SessionGucs, Tablespace};
use crate::error::Result;
use crate::gpdump_trace_object;
use crate::toc::{MetadataEntry, TocObject};

/// Groups that exist in every cluster and are altered instead of created
const BUILT_IN_RESOURCE_GROUPS: [&str; 2] = ["admin_group", "default_group"];

pub fn session_gucs_statement(gucs: &SessionGucs) -> String {
    format!(
        "SET statement_timeout = 0;\nSET check_function_bodies = false;\nSET client_min_messages = error;\
         \nSET client_encoding = '{}';\nSET standard_conforming_strings = {};\nSET default_with_oids = {};\n",
        gucs.client_encoding, gucs.standard_conforming_strings, gucs.default_with_oids
    )
}

pub fn create_tablespace_statement(tablespace: &Tablespace, caps: CatalogCapabilities) -> String {
    if caps.has_filespaces() {
        return format!(
            "\n\nCREATE TABLESPACE {} FILESPACE {};\n",
            tablespace.name, tablespace.filespace
        );
    }
    let mut sql = format!(
        "\n\nCREATE TABLESPACE {} LOCATION {}",
        tablespace.name, tablespace.file_location
    );
    if !tablespace.segment_locations.is_empty() {
        sql.push_str(&format!(" WITH ({})", tablespace.segment_locations.join(", ")));
    }
    sql.push(';');
    if !tablespace.options.is_empty() {
        sql.push_str(&format!(
            "\n\nALTER TABLESPACE {} SET ({});",
            tablespace.name, tablespace.options
        ));
    }
    sql.push('\n');
    sql
}

pub fn create_database_statement(database: &DatabaseInfo) -> String {
    let mut sql = format!("\n\nCREATE DATABASE {} TEMPLATE template0", database.name);
    if !database.tablespace.is_empty() && database.tablespace != "pg_default" {
        sql.push_str(&format!(" TABLESPACE {}", database.tablespace));
    }
    if !database.encoding.is_empty() {
        sql.push_str(&format!(" ENCODING '{}'", database.encoding));
    }
    if !database.collate.is_empty() {
        sql.push_str(&format!(" LC_COLLATE '{}'", database.collate));
    }
    if !database.ctype.is_empty() {
        sql.push_str(&format!(" LC_CTYPE '{}'", database.ctype));
    }
    sql.push_str(";\n");
    sql
}

fn cost_above(value: &str, floor: f64) -> bool {
    value.parse::<f64>().is_ok_and(|v| v > floor)
}

/// `pg_default` always exists, so it is altered rather than created.
pub fn create_resource_queue_statement(queue: &ResourceQueue) -> String {
    let mut attributes = Vec::new();
    if queue.active_statements != -1 {
        attributes.push(format!("ACTIVE_STATEMENTS={}", queue.active_statements));
    }
    if cost_above(&queue.max_cost, -1.0) {
        attributes.push(format!("MAX_COST={}", queue.max_cost));
    }
    if queue.cost_overcommit {
        attributes.push("COST_OVERCOMMIT=TRUE".to_string());
    }
    if cost_above(&queue.min_cost, 0.0) {
        attributes.push(format!("MIN_COST={}", queue.min_cost));
    }
    if !queue.priority.is_empty() && queue.priority != "medium" {
        attributes.push(format!("PRIORITY={}", queue.priority.to_uppercase()));
    }
    if queue.memory_limit != "-1" && !queue.memory_limit.is_empty() {
        attributes.push(format!("MEMORY_LIMIT='{}'", queue.memory_limit));
    }

    let verb = if queue.name == "pg_default" { "ALTER" } else { "CREATE" };
    if attributes.is_empty() {
        format!("\n\n{verb} RESOURCE QUEUE {};\n", queue.name)
    } else {
        format!(
            "\n\n{verb} RESOURCE QUEUE {} WITH ({});\n",
            queue.name,
            attributes.join(", ")
        )
    }
}

fn resource_group_cpu(group: &ResourceGroup) -> (&'static str, String) {
    if group.uses_cpuset() {
        ("CPUSET", format!("'{}'", group.cpuset))
    } else {
        ("CPU_RATE_LIMIT", group.cpu_rate_limit.clone())
    }
}

/// One `SET` per limit for the built-in groups, a full `CREATE` otherwise.
pub fn resource_group_statement(group: &ResourceGroup) -> String {
    let (cpu_key, cpu_value) = resource_group_cpu(group);
    let limits = [
        (cpu_key, cpu_value),
        ("MEMORY_LIMIT", group.memory_limit.clone()),
        ("MEMORY_SHARED_QUOTA", group.memory_shared_quota.clone()),
        ("MEMORY_SPILL_RATIO", group.memory_spill_ratio.clone()),
        ("CONCURRENCY", group.concurrency.clone()),
    ];

    if BUILT_IN_RESOURCE_GROUPS.contains(&group.name.as_str()) {
        let statements: Vec<String> = limits
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("ALTER RESOURCE GROUP {} SET {key} {value};", group.name))
            .collect();
        return format!("\n\n{}\n", statements.join("\n"));
    }

    let mut attributes = Vec::new();
    if group.memory_auditor == "1" {
        attributes.push("MEMORY_AUDITOR=cgroup".to_string());
    }
    attributes.extend(
        limits
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}={value}")),
    );
    format!(
        "\n\nCREATE RESOURCE GROUP {} WITH ({});\n",
        group.name,
        attributes.join(", ")
    )
}

fn role_attributes(role: &Role) -> Vec<String> {
    let flag = |on: bool, yes: &str, no: &str| if on { yes.to_string() } else { no.to_string() };
    let mut attributes = vec![
        flag(role.super_user, "SUPERUSER", "NOSUPERUSER"),
        flag(role.inherit, "INHERIT", "NOINHERIT"),
        flag(role.create_role, "CREATEROLE", "NOCREATEROLE"),
        flag(role.create_db, "CREATEDB", "NOCREATEDB"),
        flag(role.can_login, "LOGIN", "NOLOGIN"),
    ];
    if role.connection_limit != -1 {
        attributes.push(format!("CONNECTION LIMIT {}", role.connection_limit));
    }
    if !role.password.is_empty() {
        attributes.push(format!("PASSWORD '{}'", role.password));
    }
    if !role.valid_until.is_empty() {
        attributes.push(format!("VALID UNTIL '{}'", role.valid_until));
    }
    if !role.resource_queue.is_empty() {
        attributes.push(format!("RESOURCE QUEUE {}", role.resource_queue));
    }
    if !role.resource_group.is_empty() {
        attributes.push(format!("RESOURCE GROUP {}", role.resource_group));
    }
    for (allowed, protocol) in [
        (role.create_r_ext_http, "protocol='http'"),
        (role.create_r_ext_gpfd, "protocol='gpfdist', type='readable'"),
        (role.create_w_ext_gpfd, "protocol='gpfdist', type='writable'"),
        (role.create_r_ext_hdfs, "protocol='gphdfs', type='readable'"),
        (role.create_w_ext_hdfs, "protocol='gphdfs', type='writable'"),
    ] {
        if allowed {
            attributes.push(format!("CREATEEXTTABLE ({protocol})"));
        }
    }
    attributes
}

pub fn create_role_statement(role: &Role) -> String {
    let mut sql = format!(
        "\n\nCREATE ROLE {name};\nALTER ROLE {name} WITH {};",
        role_attributes(role).join(" "),
        name = role.name
    );
    for window in &role.time_constraints {
        sql.push_str(&format!(
            "\nALTER ROLE {} DENY BETWEEN DAY {} TIME '{}' AND DAY {} TIME '{}';",
            role.name, window.start_day, window.start_time, window.end_day, window.end_time
        ));
    }
    sql.push('\n');
    sql
}

pub fn role_grant_statement(member: &RoleMember) -> String {
    let admin = if member.is_admin { " WITH ADMIN OPTION" } else { "" };
    let grantor = if member.grantor.is_empty() {
        String::new()
    } else {
        format!(" GRANTED BY {}", member.grantor)
    };
    format!(
        "\n\nGRANT {} TO {}{admin}{grantor};\n",
        member.role, member.member
    )
}

impl<W: Write> Emitter<'_, W> {
    pub fn print_session_gucs(&mut self, gucs: &SessionGucs) -> Result<()> {
        self.emit(gucs.metadata_entry(), &session_gucs_statement(gucs))
    }

    pub fn print_create_tablespaces(&mut self, tablespaces: &[Tablespace], metadata: &MetadataMap) -> Result<()> {
        for tablespace in tablespaces {
            self.emit(
                tablespace.metadata_entry(),
                &create_tablespace_statement(tablespace, self.caps()),
            )?;
            gpdump_trace_object!("TABLESPACE", tablespace.name);
            self.print_object_metadata(tablespace, metadata.get(&tablespace.unique_id()), None)?;
        }
        Ok(())
    }

    /// `CREATE DATABASE`, its metadata, then one entry per database-level
    /// setting.
    pub fn print_create_database(&mut self, database: &DatabaseInfo, metadata: Option<&ObjectMetadata>) -> Result<()> {
        self.emit(database.metadata_entry(), &create_database_statement(database))?;
        gpdump_trace_object!("DATABASE", database.name);
        self.print_object_metadata(database, metadata, None)?;
        for guc in &database.gucs {
            self.emit(
                MetadataEntry::new("", database.name.clone(), "DATABASE GUC"),
                &format!("\nALTER DATABASE {} {guc};", database.name),
            )?;
        }
        Ok(())
    }

    pub fn print_create_resource_queues(&mut self, queues: &[ResourceQueue], metadata: &MetadataMap) -> Result<()> {
        for queue in queues {
            self.emit(queue.metadata_entry(), &create_resource_queue_statement(queue))?;
            gpdump_trace_object!("RESOURCE QUEUE", queue.name);
            self.print_object_metadata(queue, metadata.get(&queue.unique_id()), None)?;
        }
        Ok(())
    }

    /// Built-in groups are altered before any group is created.
    pub fn print_create_resource_groups(&mut self, groups: &[ResourceGroup], metadata: &MetadataMap) -> Result<()> {
        let (built_in, created): (Vec<_>, Vec<_>) = groups
            .iter()
            .partition(|g| BUILT_IN_RESOURCE_GROUPS.contains(&g.name.as_str()));
        for group in built_in.into_iter().chain(created) {
            self.emit(group.metadata_entry(), &resource_group_statement(group))?;
            gpdump_trace_object!("RESOURCE GROUP", group.name);
            self.print_object_metadata(group, metadata.get(&group.unique_id()), None)?;
        }
        Ok(())
    }

    pub fn print_create_roles(&mut self, roles: &[Role], metadata: &MetadataMap) -> Result<()> {
        for role in roles {
            self.emit(role.metadata_entry(), &create_role_statement(role))?;
            gpdump_trace_object!("ROLE", role.name);
            self.print_object_metadata(role, metadata.get(&role.unique_id()), None)?;
        }
        Ok(())
    }

    pub fn print_role_grants(&mut self, members: &[RoleMember]) -> Result<()> {
        for member in members {
            self.emit(member.metadata_entry(), &role_grant_statement(member))?;
        }
        Ok(())
    }
}
