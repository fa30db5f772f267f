//! Entity model: immutable snapshots of catalog objects, deserialized from
//! already-fetched catalog rows.
//!
//! Names (schema, relation, type, function) are stored exactly as the catalog's
//! `quote_ident` returned them and are never re-quoted here. Empty strings mean
//! "absent" for optional text columns.

pub mod constraint;
pub mod extension;
pub mod external;
pub mod foreign;
pub mod function;
pub mod global;
pub mod operator;
pub mod postdata;
pub mod relation;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod textsearch;
pub mod types;
pub mod view;

pub use constraint::Constraint;
pub use extension::{Extension, ProceduralLanguage};
pub use external::{ExecLocation, ExternalProtocol, ExternalTableDefinition, ExternalType};
pub use foreign::{ForeignDataWrapper, ForeignServer, UserMapping};
pub use function::{Aggregate, Cast, Conversion, Function, FunctionInfo, FunctionInfoMap, Protocol};
pub use global::{
    DatabaseInfo, ResourceGroup, ResourceQueue, Role, RoleMember, SessionGucs, Tablespace,
    TimeConstraint,
};
pub use operator::{
    Operator, OperatorClass, OperatorClassFunction, OperatorClassOperator, OperatorFamily,
};
pub use postdata::{IndexDefinition, RuleDefinition, TriggerDefinition};
pub use relation::Relation;
pub use schema::Schema;
pub use sequence::{Sequence, SequenceOwner, SequenceOwnerMap};
pub use table::{
    ColumnDefinition, ExternalPartition, ForeignTableDefinition, PartitionLevel, Table,
    TableDefinition,
};
pub use textsearch::{
    TextSearchConfiguration, TextSearchDictionary, TextSearchParser, TextSearchTemplate,
};
pub use types::{
    BaseType, Collation, CompositeAttribute, CompositeType, Domain, EnumType, RangeType, ShellType,
};
pub use view::View;
