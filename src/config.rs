use crate::core::{InferenceError, Result};
use serde::{Deserialize, Serialize};
use sqlparser::dialect::{Dialect, GenericDialect, MsSqlDialect, PostgreSqlDialect};

pub const DRAFT_07_SCHEMA_URI: &str = "http://json-schema.org/draft-07/schema#";
pub const DEFAULT_DEFINITIONS_PREFIX: &str = "#/definitions/";
pub const DEFAULT_NULL_MARKER: &str = "null";
pub const DEFAULT_VARIABLE_PREFIX: &str = "@";

/// SQL dialect used when parsing SELECT statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialectKind {
    #[default]
    MsSql,
    Generic,
    Postgres,
}

impl SqlDialectKind {
    pub fn dialect(&self) -> Box<dyn Dialect + Send + Sync> {
        match self {
            SqlDialectKind::MsSql => Box::new(MsSqlDialect {}),
            SqlDialectKind::Generic => Box::new(GenericDialect {}),
            SqlDialectKind::Postgres => Box::new(PostgreSqlDialect {}),
        }
    }
}

/// Schema inference configuration
///
/// Defaults match SQL Server procedure text and draft-07 output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Dialect handed to the SELECT parser
    pub dialect: SqlDialectKind,

    /// Source tag the parser emits for columns with no table in scope
    pub null_marker: String,

    /// Prefix identifying session variables and parameters
    pub variable_prefix: String,

    /// Prefix prepended to the entity name to form `$id`
    pub definitions_prefix: String,

    /// Value written to `$schema`
    pub schema_uri: String,

    /// Run the structural self-check on every synthesized document
    pub self_check: bool,

    /// Expand `*` and `alias.*` into the columns of the referenced table
    pub expand_wildcards: bool,
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self {
            dialect: SqlDialectKind::MsSql,
            null_marker: DEFAULT_NULL_MARKER.to_string(),
            variable_prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
            definitions_prefix: DEFAULT_DEFINITIONS_PREFIX.to_string(),
            schema_uri: DRAFT_07_SCHEMA_URI.to_string(),
            self_check: true,
            expand_wildcards: true,
        }
    }

    /// Set the SQL dialect
    pub fn dialect(mut self, dialect: SqlDialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the variable prefix
    pub fn variable_prefix(mut self, prefix: &str) -> Self {
        self.variable_prefix = prefix.to_string();
        self
    }

    /// Set the `$id` prefix
    pub fn definitions_prefix(mut self, prefix: &str) -> Self {
        self.definitions_prefix = prefix.to_string();
        self
    }

    /// Enable or disable the document self-check
    pub fn self_check(mut self, enabled: bool) -> Self {
        self.self_check = enabled;
        self
    }

    /// Enable or disable wildcard expansion
    pub fn expand_wildcards(mut self, enabled: bool) -> Self {
        self.expand_wildcards = enabled;
        self
    }

    /// Load from a JSON document; missing keys keep their defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use procschema::{InferenceConfig, SqlDialectKind};
    ///
    /// let config = InferenceConfig::from_json_str(r#"{"dialect": "postgres"}"#).unwrap();
    /// assert_eq!(config.dialect, SqlDialectKind::Postgres);
    /// assert_eq!(config.variable_prefix, "@");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| InferenceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `$id` for an entity
    pub fn schema_id(&self, entity_name: &str) -> String {
        format!("{}{}", self.definitions_prefix, entity_name)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.null_marker.is_empty() {
            return Err(InferenceError::Config("null_marker cannot be empty".to_string()));
        }

        if self.variable_prefix.is_empty() {
            return Err(InferenceError::Config("variable_prefix cannot be empty".to_string()));
        }

        if self.schema_uri.is_empty() {
            return Err(InferenceError::Config("schema_uri cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.dialect, SqlDialectKind::MsSql);
        assert_eq!(config.null_marker, "null");
        assert_eq!(config.variable_prefix, "@");
        assert_eq!(config.schema_uri, DRAFT_07_SCHEMA_URI);
        assert!(config.self_check);
        assert!(config.expand_wildcards);
    }

    #[test]
    fn test_builder_pattern() {
        let config = InferenceConfig::new()
            .dialect(SqlDialectKind::Generic)
            .variable_prefix(":")
            .definitions_prefix("#/$defs/")
            .self_check(false);

        assert_eq!(config.dialect, SqlDialectKind::Generic);
        assert_eq!(config.variable_prefix, ":");
        assert_eq!(config.schema_id("orders"), "#/$defs/orders");
        assert!(!config.self_check);
    }

    #[test]
    fn test_from_json_partial() {
        let config = InferenceConfig::from_json_str(
            r#"{"expand_wildcards": false, "variable_prefix": ":"}"#
        ).unwrap();

        assert!(!config.expand_wildcards);
        assert_eq!(config.variable_prefix, ":");
        assert_eq!(config.definitions_prefix, DEFAULT_DEFINITIONS_PREFIX);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(InferenceConfig::from_json_str("not json").is_err());
        assert!(InferenceConfig::from_json_str(r#"{"dialect": "oracle"}"#).is_err());
        assert!(InferenceConfig::from_json_str(r#"{"variable_prefix": ""}"#).is_err());
    }

    #[test]
    fn test_schema_id() {
        let config = InferenceConfig::default();
        assert_eq!(config.schema_id("orders"), "#/definitions/orders");
    }
}
