// ============================================================================
// procschema Library
// ============================================================================
//
// Static inference of stored procedure result shapes. Procedure text goes
// through body extraction, SELECT splitting, column parsing and provenance
// resolution against table metadata; the resolved columns become draft-07
// JSON Schema documents for code generators.

pub mod catalog;
pub mod config;
pub mod core;
pub mod facade;
pub mod parser;
pub mod resolver;
pub mod schema;

// Re-export main types for convenience
pub use catalog::{ColumnRow, MetadataSource, ProcedureDefinition, StaticMetadataSource, TableCatalog, TableColumns};
pub use config::{InferenceConfig, SqlDialectKind};
pub use crate::core::{ColumnInfo, Diagnostic, InferenceError, RawColumnRef, ResolvedColumn, Result, SkipReason};
pub use facade::{Coverage, PipelineOutput, ProcedureInference, SchemaPipeline};
pub use parser::{ColumnParser, SqlParserAdapter, collect_column_refs, extract_procedure_body, split_select_statements};
pub use resolver::{Resolution, resolve_columns};
pub use schema::{JsonType, PropertySchema, SchemaDocument, SchemaRegistry, SchemaSynthesizer, SchemaValidator, Synthesis};
