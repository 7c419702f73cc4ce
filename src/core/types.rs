use serde::{Deserialize, Serialize};
use std::fmt;

/// Column metadata as reported by table introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub db_type: String,
    pub nullable: bool,
}

impl ColumnInfo {
    pub fn new(db_type: impl Into<String>) -> Self {
        Self {
            db_type: db_type.into(),
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A column reference as emitted by the SELECT column parser.
///
/// `source_tag` is a table name or alias, the null marker for columns with no
/// table in scope, or a variable name (e.g. `@p1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumnRef {
    pub aggregate_fn: Option<String>,
    pub source_tag: String,
    pub column_name: String,
}

impl RawColumnRef {
    pub fn new(source_tag: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            aggregate_fn: None,
            source_tag: source_tag.into(),
            column_name: column_name.into(),
        }
    }

    pub fn with_aggregate(mut self, aggregate_fn: impl Into<String>) -> Self {
        self.aggregate_fn = Some(aggregate_fn.into());
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.column_name == "*"
    }
}

impl fmt::Display for RawColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.aggregate_fn {
            Some(func) => write!(f, "{}({}.{})", func, self.source_tag, self.column_name),
            None => write!(f, "{}.{}", self.source_tag, self.column_name),
        }
    }
}

/// A result column matched back to a known table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    pub table: String,
    pub column: String,
    pub db_type: String,
    pub nullable: bool,
}

impl ResolvedColumn {
    pub(crate) fn from_catalog(table: &str, column: &str, info: &ColumnInfo) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            db_type: info.db_type.clone(),
            nullable: info.nullable,
        }
    }
}
