//! Permission parsing and the per-object metadata block (comment, owner,
//! privileges, security label).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogCapabilities;
use crate::error::{DumpError, Result};
use crate::utils::escape_single_quotes;

// =============================================================================
// Privileges
// =============================================================================

/// One grantable privilege kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Privilege {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    References,
    Trigger,
    Execute,
    Usage,
    Create,
    Temporary,
    Connect,
}

impl Privilege {
    /// GRANT rendering order. Execute is never listed on its own since
    /// functions only carry Execute and always collapse to `ALL`.
    const GRANT_ORDER: [Privilege; 11] = [
        Privilege::Select,
        Privilege::Insert,
        Privilege::Update,
        Privilege::Delete,
        Privilege::Truncate,
        Privilege::References,
        Privilege::Trigger,
        Privilege::Usage,
        Privilege::Create,
        Privilege::Temporary,
        Privilege::Connect,
    ];

    /// Map one ACL item character to its privilege
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'a' => Self::Insert,
            'r' => Self::Select,
            'w' => Self::Update,
            'd' => Self::Delete,
            'D' => Self::Truncate,
            'x' => Self::References,
            't' => Self::Trigger,
            'X' => Self::Execute,
            'U' => Self::Usage,
            'C' => Self::Create,
            'T' => Self::Temporary,
            'c' => Self::Connect,
            _ => return None,
        })
    }

    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::References => "REFERENCES",
            Self::Trigger => "TRIGGER",
            Self::Execute => "EXECUTE",
            Self::Usage => "USAGE",
            Self::Create => "CREATE",
            Self::Temporary => "TEMPORARY",
            Self::Connect => "CONNECT",
        }
    }

    const fn bit(&self) -> u16 {
        1 << (*self as u16)
    }

    /// The privilege set that `GRANT ALL` stands for on an object type.
    fn all_for(object_type: &str) -> &'static [Privilege] {
        use Privilege::*;
        match object_type {
            "COLUMN" => &[Select, Insert, Update, References],
            "DATABASE" => &[Create, Temporary, Connect],
            "FOREIGN DATA WRAPPER" | "FOREIGN SERVER" | "LANGUAGE" | "TYPE" | "DOMAIN" => &[Usage],
            "FOREIGN TABLE" => &[Select, Insert, Update, Delete, References, Trigger],
            "FUNCTION" | "AGGREGATE" => &[Execute],
            "PROTOCOL" => &[Select, Insert],
            "SCHEMA" => &[Usage, Create],
            "SEQUENCE" => &[Select, Update, Usage],
            "TABLE" | "VIEW" | "MATERIALIZED VIEW" => {
                &[Select, Insert, Update, Delete, Truncate, References, Trigger]
            }
            "TABLESPACE" => &[Create],
            _ => &[],
        }
    }
}

/// Who a privilege set is granted to
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grantee {
    Public,
    Role(String),
}

impl fmt::Display for Grantee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => f.write_str("PUBLIC"),
            Self::Role(name) => f.write_str(name),
        }
    }
}

// =============================================================================
// ACL
// =============================================================================

/// One grantee's privileges, each with an independent with-grant-option flag.
///
/// Only [`parse_acl`] and [`Acl::empty`] produce these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acl {
    pub grantee: Grantee,
    plain: u16,
    with_grant: u16,
}

impl Acl {
    /// An explicit "nothing granted to anyone" entry. Distinct from an absent
    /// ACL, which means default privileges.
    pub const fn empty() -> Self {
        Self {
            grantee: Grantee::Public,
            plain: 0,
            with_grant: 0,
        }
    }

    pub const fn has(&self, privilege: Privilege) -> bool {
        self.plain & privilege.bit() != 0
    }

    pub const fn has_with_grant(&self, privilege: Privilege) -> bool {
        self.with_grant & privilege.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.plain == 0 && self.with_grant == 0
    }

    fn render(&self, object_type: &str, with_grant: bool) -> String {
        let held = |p: Privilege| {
            if with_grant {
                self.has_with_grant(p)
            } else {
                self.has(p)
            }
        };
        let all = Privilege::all_for(object_type);
        if !all.is_empty() && all.iter().all(|p| held(*p)) {
            return "ALL".to_string();
        }
        Privilege::GRANT_ORDER
            .iter()
            .filter(|p| held(**p))
            .map(Privilege::as_sql)
            .collect::<Vec<_>>()
            .join(",")
    }
}

static ACL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn acl_pattern() -> Result<&'static Regex> {
    if let Some(pattern) = ACL_PATTERN.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r#"^(?:"((?:[^"]|"")*)"|([^=]*))=([a-zA-Z*]*)/(.*)$"#)?;
    Ok(ACL_PATTERN.get_or_init(|| pattern))
}

/// Parse one `grantee=privs/grantor` item.
///
/// An empty string yields `None` (default privileges). An empty grantee
/// denotes PUBLIC. A character followed by `*` carries the grant option
/// instead of the plain privilege.
pub fn parse_acl(raw: &str) -> Result<Option<Acl>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let caps = acl_pattern()?
        .captures(raw)
        .ok_or_else(|| DumpError::MalformedAcl(raw.to_string()))?;

    let grantee = match (caps.get(1), caps.get(2)) {
        (Some(quoted), _) => Grantee::Role(quoted.as_str().replace("\"\"", "\"")),
        (None, Some(bare)) if !bare.as_str().is_empty() => Grantee::Role(bare.as_str().to_string()),
        _ => Grantee::Public,
    };

    let mut acl = Acl {
        grantee,
        plain: 0,
        with_grant: 0,
    };
    let mut chars = caps[3].chars().peekable();
    while let Some(code) = chars.next() {
        let privilege =
            Privilege::from_code(code).ok_or_else(|| DumpError::MalformedAcl(raw.to_string()))?;
        if chars.peek() == Some(&'*') {
            chars.next();
            acl.with_grant |= privilege.bit();
        } else {
            acl.plain |= privilege.bit();
        }
    }
    Ok(Some(acl))
}

/// Resolve a privileges column together with its kind discriminator.
///
/// `Default` means unset, `Empty` means an explicit revoke-everything entry.
fn resolve_acl(privileges: Option<&str>, kind: &str) -> Result<Option<Acl>> {
    match kind {
        "Default" => Ok(None),
        "Empty" => Ok(Some(Acl::empty())),
        _ => parse_acl(privileges.unwrap_or_default()),
    }
}

fn sort_acls(acls: &mut [Acl]) {
    acls.sort_by(|a, b| a.grantee.cmp(&b.grantee));
}

// =============================================================================
// Object Metadata
// =============================================================================

/// Catalog class plus oid; unique across object kinds.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct UniqueId {
    pub class_id: u32,
    pub oid: u32,
}

impl UniqueId {
    pub const fn new(class_id: u32, oid: u32) -> Self {
        Self { class_id, oid }
    }
}

/// Well-known `pg_class` oids of the catalogs objects live in.
pub mod class {
    pub const PG_AUTHID: u32 = 1260;
    pub const PG_CAST: u32 = 2605;
    pub const PG_CLASS: u32 = 1259;
    pub const PG_COLLATION: u32 = 3456;
    pub const PG_CONSTRAINT: u32 = 2606;
    pub const PG_CONVERSION: u32 = 2607;
    pub const PG_DATABASE: u32 = 1262;
    pub const PG_EXTENSION: u32 = 3079;
    pub const PG_EXTPROTOCOL: u32 = 7175;
    pub const PG_FOREIGN_DATA_WRAPPER: u32 = 2328;
    pub const PG_FOREIGN_SERVER: u32 = 1417;
    pub const PG_LANGUAGE: u32 = 2612;
    pub const PG_NAMESPACE: u32 = 2615;
    pub const PG_OPCLASS: u32 = 2616;
    pub const PG_OPERATOR: u32 = 2617;
    pub const PG_OPFAMILY: u32 = 2753;
    pub const PG_PROC: u32 = 1255;
    pub const PG_RESGROUP: u32 = 6436;
    pub const PG_RESQUEUE: u32 = 6026;
    pub const PG_REWRITE: u32 = 2618;
    pub const PG_TABLESPACE: u32 = 1213;
    pub const PG_TRIGGER: u32 = 2620;
    pub const PG_TS_CONFIG: u32 = 3602;
    pub const PG_TS_DICT: u32 = 3600;
    pub const PG_TS_PARSER: u32 = 3601;
    pub const PG_TS_TEMPLATE: u32 = 3764;
    pub const PG_TYPE: u32 = 1247;
}

/// Comment, owner, privileges and security label of one object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectMetadata {
    pub privileges: Vec<Acl>,
    pub owner: String,
    pub comment: String,
    pub security_label_provider: String,
    pub security_label: String,
}

pub type MetadataMap = HashMap<UniqueId, ObjectMetadata>;

/// One row of a metadata query; an object with several grantees spans
/// several consecutive rows.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataRow {
    pub class_id: u32,
    pub oid: u32,
    pub privileges: Option<String>,
    pub kind: String,
    pub owner: String,
    pub comment: String,
    pub security_label_provider: String,
    pub security_label: String,
}

/// Fold metadata rows into one [`ObjectMetadata`] per object.
pub fn construct_metadata_map(rows: &[MetadataRow]) -> Result<MetadataMap> {
    let mut map = MetadataMap::new();
    for row in rows {
        let id = UniqueId::new(row.class_id, row.oid);
        let metadata = map.entry(id).or_insert_with(|| ObjectMetadata {
            privileges: Vec::new(),
            owner: row.owner.clone(),
            comment: row.comment.clone(),
            security_label_provider: row.security_label_provider.clone(),
            security_label: row.security_label.clone(),
        });
        if let Some(acl) = resolve_acl(row.privileges.as_deref(), &row.kind)? {
            metadata.privileges.push(acl);
        }
    }
    for metadata in map.values_mut() {
        sort_acls(&mut metadata.privileges);
    }
    Ok(map)
}

/// One grantee row of a column privileges query.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnPrivilegeRow {
    pub table_oid: u32,
    pub name: String,
    pub privileges: Option<String>,
    pub kind: String,
}

/// Table oid → column name → ACLs.
pub type ColumnPrivilegesMap = HashMap<u32, BTreeMap<String, Vec<Acl>>>;

pub fn construct_column_privileges_map(rows: &[ColumnPrivilegeRow]) -> Result<ColumnPrivilegesMap> {
    let mut map = ColumnPrivilegesMap::new();
    for row in rows {
        let acls = map
            .entry(row.table_oid)
            .or_default()
            .entry(row.name.clone())
            .or_default();
        if let Some(acl) = resolve_acl(row.privileges.as_deref(), &row.kind)? {
            acls.push(acl);
            sort_acls(acls);
        }
    }
    Ok(map)
}

impl ObjectMetadata {
    /// `REVOKE`/`GRANT` statements, joined by newlines, or `None` when the
    /// object has default privileges.
    pub fn privileges_statements(
        &self,
        object_name: &str,
        object_type: &str,
        column: Option<&str>,
    ) -> Option<String> {
        privileges_statements(&self.privileges, &self.owner, object_name, object_type, column)
    }

    pub fn owner_statement(
        &self,
        object_name: &str,
        object_type: &str,
        caps: CatalogCapabilities,
    ) -> Option<String> {
        if self.owner.is_empty() {
            return None;
        }
        let type_str = match object_type {
            "SEQUENCE" | "VIEW" if caps.owner_uses_table_keyword() => "TABLE",
            "FOREIGN SERVER" => "SERVER",
            other => other,
        };
        Some(format!("ALTER {type_str} {object_name} OWNER TO {};", self.owner))
    }

    pub fn comment_statement(
        &self,
        object_name: &str,
        object_type: &str,
        owning_table: Option<&str>,
    ) -> Option<String> {
        comment_statement(&self.comment, object_name, object_type, owning_table)
    }

    pub fn security_label_statement(&self, object_name: &str, object_type: &str) -> Option<String> {
        security_label_statement(
            &self.security_label_provider,
            &self.security_label,
            object_name,
            object_type,
        )
    }
}

pub(crate) fn privileges_statements(
    privileges: &[Acl],
    owner: &str,
    object_name: &str,
    object_type: &str,
    column: Option<&str>,
) -> Option<String> {
    if privileges.is_empty() {
        return None;
    }
    let type_str = match object_type {
        "VIEW" | "FOREIGN TABLE" | "MATERIALIZED VIEW" => String::new(),
        "COLUMN" => "TABLE ".to_string(),
        "AGGREGATE" => "FUNCTION ".to_string(),
        other => format!("{other} "),
    };
    let column_str = column.map(|c| format!("({c}) ")).unwrap_or_default();

    let mut statements = vec![format!(
        "REVOKE ALL {column_str}ON {type_str}{object_name} FROM PUBLIC;"
    )];
    if !owner.is_empty() {
        statements.push(format!(
            "REVOKE ALL {column_str}ON {type_str}{object_name} FROM {owner};"
        ));
    }
    for acl in privileges {
        let plain = acl.render(object_type, false);
        if !plain.is_empty() {
            statements.push(format!(
                "GRANT {plain} {column_str}ON {type_str}{object_name} TO {};",
                acl.grantee
            ));
        }
        let with_grant = acl.render(object_type, true);
        if !with_grant.is_empty() {
            statements.push(format!(
                "GRANT {with_grant} {column_str}ON {type_str}{object_name} TO {} WITH GRANT OPTION;",
                acl.grantee
            ));
        }
    }
    Some(statements.join("\n"))
}

pub(crate) fn comment_statement(
    comment: &str,
    object_name: &str,
    object_type: &str,
    owning_table: Option<&str>,
) -> Option<String> {
    if comment.is_empty() {
        return None;
    }
    let table_str = owning_table.map(|t| format!(" ON {t}")).unwrap_or_default();
    let object_type = match object_type {
        "FOREIGN SERVER" => "SERVER",
        other => other,
    };
    Some(format!(
        "COMMENT ON {object_type} {object_name}{table_str} IS '{}';",
        escape_single_quotes(comment)
    ))
}

pub(crate) fn security_label_statement(
    provider: &str,
    label: &str,
    object_name: &str,
    object_type: &str,
) -> Option<String> {
    if label.is_empty() {
        return None;
    }
    Some(format!(
        "SECURITY LABEL FOR {provider} ON {object_type} {object_name} IS '{}';",
        escape_single_quotes(label)
    ))
}
