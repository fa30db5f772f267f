use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DumpError, Result};

/// Readable/writable and web-ness of an external table; derived, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalType {
    Readable,
    ReadableWeb,
    Writable,
    WritableWeb,
}

impl ExternalType {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            ExternalType::Readable => "READABLE EXTERNAL",
            ExternalType::ReadableWeb => "READABLE EXTERNAL WEB",
            ExternalType::Writable => "WRITABLE EXTERNAL",
            ExternalType::WritableWeb => "WRITABLE EXTERNAL WEB",
        }
    }

    pub const fn is_readable(&self) -> bool {
        matches!(self, ExternalType::Readable | ExternalType::ReadableWeb)
    }

    pub const fn is_web(&self) -> bool {
        matches!(self, ExternalType::ReadableWeb | ExternalType::WritableWeb)
    }
}

/// Transport an external table reads or writes through
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExternalProtocol {
    File,
    Gpfdist,
    Gphdfs,
    Http,
    S3,
}

impl ExternalProtocol {
    fn from_scheme(scheme: &str) -> Option<Self> {
        Some(match scheme {
            "file" => ExternalProtocol::File,
            "gpfdist" | "gpfdists" => ExternalProtocol::Gpfdist,
            "gphdfs" => ExternalProtocol::Gphdfs,
            "http" | "https" => ExternalProtocol::Http,
            "s3" => ExternalProtocol::S3,
            _ => return None,
        })
    }
}

/// Where an `EXECUTE` command runs, parsed from the catalog's
/// `execlocation` token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecLocation {
    AllSegments,
    Host(String),
    PerHost,
    MasterOnly,
    SegmentId(String),
    TotalSegs(String),
}

impl FromStr for ExecLocation {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, arg) = match s.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg)),
            None => (s, None),
        };
        match (kind, arg) {
            ("ALL_SEGMENTS", None) => Ok(ExecLocation::AllSegments),
            ("HOST", Some(host)) => Ok(ExecLocation::Host(host.to_string())),
            ("HOST", None) | ("PER_HOST", None) => Ok(ExecLocation::PerHost),
            ("MASTER_ONLY", None) => Ok(ExecLocation::MasterOnly),
            ("SEGMENT_ID", Some(id)) => Ok(ExecLocation::SegmentId(id.to_string())),
            ("TOTAL_SEGS", Some(n)) => Ok(ExecLocation::TotalSegs(n.to_string())),
            _ => Err(DumpError::InvalidExecLocation(s.to_string())),
        }
    }
}

impl fmt::Display for ExecLocation {
    /// The `ON ...` suffix of an `EXECUTE` clause; empty for the default.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecLocation::AllSegments => Ok(()),
            ExecLocation::Host(host) => write!(f, " ON HOST '{host}'"),
            ExecLocation::PerHost => f.write_str(" ON HOST"),
            ExecLocation::MasterOnly => f.write_str(" ON MASTER"),
            ExecLocation::SegmentId(id) => write!(f, " ON SEGMENT {id}"),
            ExecLocation::TotalSegs(n) => write!(f, " ON {n}"),
        }
    }
}

/// `pg_exttable` row for one external table.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalTableDefinition {
    pub oid: u32,
    /// Comma-separated location URIs; empty for `EXECUTE` tables
    pub location: String,
    pub exec_location: String,
    /// Single-letter format code
    pub format_type: String,
    pub format_opts: String,
    pub options: String,
    pub command: String,
    pub reject_limit: i32,
    /// `r` for rows, `p` for percent
    pub reject_limit_type: String,
    /// Error table name; equal to the table's own name when logging into itself
    pub err_table: String,
    pub log_errors_persistently: bool,
    pub encoding: String,
    pub writable: bool,
}

impl ExternalTableDefinition {
    /// Derive type and protocol from the stored fields.
    ///
    /// A location-less table is an `EXECUTE` web table over HTTP. A location
    /// whose scheme is not one of the known protocols is an error.
    pub fn classify(&self) -> Result<(ExternalType, ExternalProtocol)> {
        if self.location.is_empty() {
            if self.command.is_empty() {
                return Err(DumpError::MissingExternalSource);
            }
            let ext_type = if self.writable {
                ExternalType::WritableWeb
            } else {
                ExternalType::ReadableWeb
            };
            return Ok((ext_type, ExternalProtocol::Http));
        }

        let is_web = self.location.starts_with("http");
        let ext_type = match (is_web, self.writable) {
            (true, true) => ExternalType::WritableWeb,
            (true, false) => ExternalType::ReadableWeb,
            (false, true) => ExternalType::Writable,
            (false, false) => ExternalType::Readable,
        };
        let protocol = self
            .location
            .split_once("://")
            .and_then(|(scheme, _)| ExternalProtocol::from_scheme(scheme))
            .ok_or_else(|| DumpError::UnrecognizedExternalProtocol(self.location.clone()))?;
        Ok((ext_type, protocol))
    }

    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.location.split(',').filter(|uri| !uri.is_empty())
    }

    /// Format name for the single-letter catalog code
    pub fn format_name(&self) -> &'static str {
        match self.format_type.as_str() {
            "a" => "avro",
            "b" => "custom",
            "c" => "csv",
            "p" => "parquet",
            "t" => "text",
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(location: &str, command: &str, writable: bool) -> ExternalTableDefinition {
        ExternalTableDefinition {
            location: location.to_string(),
            command: command.to_string(),
            writable,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_file() {
        assert_eq!(
            ext("file://host:port/file", "", false).classify().unwrap(),
            (ExternalType::Readable, ExternalProtocol::File)
        );
        assert_eq!(
            ext("file://host:port/file", "", true).classify().unwrap(),
            (ExternalType::Writable, ExternalProtocol::File)
        );
    }

    #[test]
    fn test_classify_web_and_s3() {
        assert_eq!(
            ext("http://webhost:port/file", "", false).classify().unwrap(),
            (ExternalType::ReadableWeb, ExternalProtocol::Http)
        );
        assert_eq!(
            ext("", "hostname", true).classify().unwrap(),
            (ExternalType::WritableWeb, ExternalProtocol::Http)
        );
        assert_eq!(
            ext("s3://s3_endpoint:port/bucket_name/s3_prefix", "", false)
                .classify()
                .unwrap(),
            (ExternalType::Readable, ExternalProtocol::S3)
        );
        assert_eq!(
            ext("gpfdists://host:8081/f", "", false).classify().unwrap().1,
            ExternalProtocol::Gpfdist
        );
    }

    #[test]
    fn test_classify_errors() {
        assert!(matches!(
            ext("ftp://host/file", "", false).classify(),
            Err(DumpError::UnrecognizedExternalProtocol(_))
        ));
        assert!(matches!(
            ext("", "", false).classify(),
            Err(DumpError::MissingExternalSource)
        ));
    }

    #[test]
    fn test_exec_location_tokens() {
        let on = |s: &str| s.parse::<ExecLocation>().unwrap().to_string();
        assert_eq!(on("ALL_SEGMENTS"), "");
        assert_eq!(on("HOST:localhost"), " ON HOST 'localhost'");
        assert_eq!(on("HOST"), " ON HOST");
        assert_eq!(on("PER_HOST"), " ON HOST");
        assert_eq!(on("MASTER_ONLY"), " ON MASTER");
        assert_eq!(on("SEGMENT_ID:0"), " ON SEGMENT 0");
        assert_eq!(on("TOTAL_SEGS:3"), " ON 3");
        assert!("SOMEWHERE".parse::<ExecLocation>().is_err());
    }
}
