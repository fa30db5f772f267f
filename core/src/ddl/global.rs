//! Cluster-wide objects restored before any database content.

use serde::{Deserialize, Serialize};

use crate::acl::{UniqueId, class};
use crate::toc::{MetadataEntry, TocObject};

/// Session settings the restore runs under.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionGucs {
    pub client_encoding: String,
    pub standard_conforming_strings: String,
    pub default_with_oids: String,
}

impl Default for SessionGucs {
    fn default() -> Self {
        Self {
            client_encoding: "UTF8".to_string(),
            standard_conforming_strings: "on".to_string(),
            default_with_oids: "off".to_string(),
        }
    }
}

impl TocObject for SessionGucs {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", "", "SESSION GUCS")
    }

    fn fqn(&self) -> String {
        String::new()
    }
}

/// The database being backed up.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseInfo {
    pub oid: u32,
    pub name: String,
    pub tablespace: String,
    pub encoding: String,
    pub collate: String,
    pub ctype: String,
    /// Rendered `SET name TO value` clauses from `pg_db_role_setting`
    pub gucs: Vec<String>,
}

impl DatabaseInfo {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_DATABASE, self.oid)
    }
}

impl TocObject for DatabaseInfo {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "DATABASE")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

/// `pg_resqueue` row. `-1` means unlimited for the numeric limits.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceQueue {
    pub oid: u32,
    pub name: String,
    pub active_statements: i32,
    pub max_cost: String,
    pub cost_overcommit: bool,
    pub min_cost: String,
    pub priority: String,
    pub memory_limit: String,
}

impl Default for ResourceQueue {
    fn default() -> Self {
        Self {
            oid: 0,
            name: String::new(),
            active_statements: -1,
            max_cost: "-1".to_string(),
            cost_overcommit: false,
            min_cost: "0".to_string(),
            priority: "medium".to_string(),
            memory_limit: "-1".to_string(),
        }
    }
}

impl ResourceQueue {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_RESQUEUE, self.oid)
    }
}

impl TocObject for ResourceQueue {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "RESOURCE QUEUE")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

/// `pg_resgroupcapability` pivoted to one row per group. Limits are kept as
/// the catalog's text values.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceGroup {
    pub oid: u32,
    pub name: String,
    pub concurrency: String,
    pub cpu_rate_limit: String,
    /// Set instead of `cpu_rate_limit` when the group pins cores; `-1` otherwise
    pub cpuset: String,
    pub memory_limit: String,
    pub memory_shared_quota: String,
    pub memory_spill_ratio: String,
    /// `0` vmtracker, `1` cgroup
    pub memory_auditor: String,
}

impl ResourceGroup {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_RESGROUP, self.oid)
    }

    pub fn uses_cpuset(&self) -> bool {
        !self.cpuset.is_empty() && self.cpuset != "-1"
    }
}

impl TocObject for ResourceGroup {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "RESOURCE GROUP")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

/// A `DENY BETWEEN` window on a role's logins
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeConstraint {
    pub start_day: i32,
    pub start_time: String,
    pub end_day: i32,
    pub end_time: String,
}

/// `pg_authid` row plus its external-table permissions and login windows.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub oid: u32,
    pub name: String,
    pub super_user: bool,
    pub inherit: bool,
    pub create_role: bool,
    pub create_db: bool,
    pub can_login: bool,
    /// `-1` for no limit
    pub connection_limit: i32,
    pub password: String,
    pub valid_until: String,
    pub resource_queue: String,
    pub resource_group: String,
    pub create_r_ext_gpfd: bool,
    pub create_r_ext_http: bool,
    pub create_w_ext_gpfd: bool,
    pub create_r_ext_hdfs: bool,
    pub create_w_ext_hdfs: bool,
    pub time_constraints: Vec<TimeConstraint>,
}

impl Default for Role {
    fn default() -> Self {
        Self {
            oid: 0,
            name: String::new(),
            super_user: false,
            inherit: true,
            create_role: false,
            create_db: false,
            can_login: false,
            connection_limit: -1,
            password: String::new(),
            valid_until: String::new(),
            resource_queue: String::new(),
            resource_group: String::new(),
            create_r_ext_gpfd: false,
            create_r_ext_http: false,
            create_w_ext_gpfd: false,
            create_r_ext_hdfs: false,
            create_w_ext_hdfs: false,
            time_constraints: Vec::new(),
        }
    }
}

impl Role {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_AUTHID, self.oid)
    }
}

impl TocObject for Role {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "ROLE")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}

/// `pg_auth_members` row
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleMember {
    pub role: String,
    pub member: String,
    pub grantor: String,
    pub is_admin: bool,
}

impl TocObject for RoleMember {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.member.clone(), "ROLE GRANT")
    }

    fn fqn(&self) -> String {
        self.member.clone()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Tablespace {
    pub oid: u32,
    pub name: String,
    /// Filespace name on catalog versions that still have filespaces
    pub filespace: String,
    /// Coordinator location, already quoted
    pub file_location: String,
    /// Rendered `contentN='dir'` overrides
    pub segment_locations: Vec<String>,
    /// Rendered `name=value` storage options
    pub options: String,
}

impl Tablespace {
    pub fn unique_id(&self) -> UniqueId {
        UniqueId::new(class::PG_TABLESPACE, self.oid)
    }
}

impl TocObject for Tablespace {
    fn metadata_entry(&self) -> MetadataEntry {
        MetadataEntry::new("", self.name.clone(), "TABLESPACE")
    }

    fn fqn(&self) -> String {
        self.name.clone()
    }
}
