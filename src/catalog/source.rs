use super::table::TableCatalog;
use crate::core::{InferenceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored procedure as reported by introspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureDefinition {
    pub name: String,
    /// Full `CREATE PROCEDURE ...` text
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl ProcedureDefinition {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
            created_at: None,
            modified_at: None,
        }
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, modified_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self.modified_at = Some(modified_at);
        self
    }
}

/// Database introspection seam
///
/// Implementations talk to a live server; the pipeline only needs these two
/// listings. Errors here are the only ones the pipeline propagates.
pub trait MetadataSource {
    fn list_tables(&self) -> Result<TableCatalog>;

    fn list_procedures(&self) -> Result<Vec<ProcedureDefinition>>;
}

/// In-memory metadata, e.g. loaded from a JSON fixture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticMetadataSource {
    #[serde(default)]
    pub tables: TableCatalog,
    #[serde(default)]
    pub procedures: Vec<ProcedureDefinition>,
}

impl StaticMetadataSource {
    pub fn new(tables: TableCatalog, procedures: Vec<ProcedureDefinition>) -> Self {
        Self { tables, procedures }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| InferenceError::MetadataSource(e.to_string()))
    }
}

impl MetadataSource for StaticMetadataSource {
    fn list_tables(&self) -> Result<TableCatalog> {
        Ok(self.tables.clone())
    }

    fn list_procedures(&self) -> Result<Vec<ProcedureDefinition>> {
        Ok(self.procedures.clone())
    }
}
