use crate::catalog::{MetadataSource, ProcedureDefinition, TableCatalog};
use crate::config::InferenceConfig;
use crate::core::{Diagnostic, ResolvedColumn, Result, SkipReason};
use crate::parser::{ColumnParser, SqlParserAdapter, collect_column_refs, extract_procedure_body};
use crate::resolver::resolve_columns;
use crate::schema::{SchemaDocument, SchemaRegistry, SchemaSynthesizer, Synthesis};
use std::sync::Arc;
use tracing::{Level, event, info_span};

/// Resolved result columns of one procedure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcedureInference {
    pub columns: Vec<ResolvedColumn>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts for reporting partial coverage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coverage {
    pub tables: usize,
    pub procedures: usize,
    pub parse_failures: usize,
    pub dropped_columns: usize,
    pub self_check_failures: usize,
}

/// Everything a run produced, tables first then procedures
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub documents: Vec<Arc<SchemaDocument>>,
    pub diagnostics: Vec<Diagnostic>,
    tables: usize,
}

impl PipelineOutput {
    /// Pretty JSON per document, in emission order
    pub fn to_json_strings(&self) -> Result<Vec<String>> {
        self.documents.iter().map(|doc| doc.to_json_pretty()).collect()
    }

    pub fn table_documents(&self) -> &[Arc<SchemaDocument>] {
        &self.documents[..self.tables]
    }

    pub fn procedure_documents(&self) -> &[Arc<SchemaDocument>] {
        &self.documents[self.tables..]
    }

    /// Variable and null-source drops are expected and not counted
    pub fn coverage(&self) -> Coverage {
        let mut coverage = Coverage {
            tables: self.tables,
            procedures: self.documents.len() - self.tables,
            ..Coverage::default()
        };

        for diagnostic in &self.diagnostics {
            match diagnostic {
                Diagnostic::StatementParseFailure { .. } => coverage.parse_failures += 1,
                Diagnostic::UnresolvedColumn { reason: SkipReason::UnknownTable | SkipReason::UnknownColumn, .. } => {
                    coverage.dropped_columns += 1
                }
                Diagnostic::UnresolvedColumn { .. } => {}
                Diagnostic::SchemaSelfCheckFailure { .. } => coverage.self_check_failures += 1,
            }
        }

        coverage
    }
}

/// Drives inference for a whole database
///
/// Tables are synthesized before procedures so that procedure columns can
/// reference table schemas. The registry lives as long as the pipeline.
///
/// # Examples
///
/// ```
/// use procschema::{ProcedureDefinition, SchemaPipeline, StaticMetadataSource, TableCatalog};
///
/// let tables = TableCatalog::from_column_rows(vec![
///     ("orders".to_string(), "id".to_string(), "int".to_string(), false),
/// ]);
/// let procedures = vec![ProcedureDefinition::new(
///     "GetOrders",
///     "CREATE PROCEDURE GetOrders AS BEGIN SELECT id FROM orders END",
/// )];
///
/// let mut pipeline = SchemaPipeline::default();
/// let output = pipeline.run(&StaticMetadataSource::new(tables, procedures)).unwrap();
///
/// assert_eq!(output.documents.len(), 2);
/// assert_eq!(output.documents[1].title, "GetOrders");
/// ```
pub struct SchemaPipeline {
    config: InferenceConfig,
    parser: Box<dyn ColumnParser>,
    synthesizer: SchemaSynthesizer,
    registry: SchemaRegistry,
}

impl SchemaPipeline {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            parser: Box::new(SqlParserAdapter::with_config(&config)),
            synthesizer: SchemaSynthesizer::new(config.clone()),
            registry: SchemaRegistry::new(),
            config,
        }
    }

    /// Replace the SELECT column parser
    pub fn with_parser(mut self, parser: Box<dyn ColumnParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    /// Forget every registered schema
    pub fn reset(&mut self) {
        self.registry.reset();
    }

    /// Load metadata from `source` and synthesize every table and procedure.
    ///
    /// Only failures of the metadata source are returned as errors.
    pub fn run(&mut self, source: &dyn MetadataSource) -> Result<PipelineOutput> {
        let catalog = source.list_tables()?;
        let procedures = source.list_procedures()?;

        let mut output = PipelineOutput::default();

        for (table_name, columns) in catalog.iter() {
            let synthesis = self.synthesizer.synthesize_table(table_name, columns, &mut self.registry);
            Self::collect(&mut output, synthesis);
        }
        output.tables = catalog.len();

        for procedure in &procedures {
            let synthesis = self.synthesize_procedure(procedure, &catalog);
            Self::collect(&mut output, synthesis);
        }

        let coverage = output.coverage();
        event!(
            Level::INFO,
            tables = coverage.tables,
            procedures = coverage.procedures,
            parse_failures = coverage.parse_failures,
            dropped_columns = coverage.dropped_columns,
            "schema inference finished"
        );

        Ok(output)
    }

    /// Extract, split, parse and resolve one procedure without synthesizing
    pub fn infer_procedure(&self, procedure: &ProcedureDefinition, catalog: &TableCatalog) -> ProcedureInference {
        let span = info_span!("infer_procedure", procedure = %procedure.name);
        let _guard = span.enter();

        let body = extract_procedure_body(&procedure.definition);
        let collection = collect_column_refs(&procedure.name, body, self.parser.as_ref());
        let resolution = resolve_columns(&procedure.name, &collection.columns, catalog, &self.config);

        let mut diagnostics = collection.diagnostics;
        diagnostics.extend(resolution.diagnostics);

        event!(
            Level::DEBUG,
            parsed = collection.columns.len(),
            resolved = resolution.columns.len(),
            "procedure columns resolved"
        );

        ProcedureInference {
            columns: resolution.columns,
            diagnostics,
        }
    }

    /// Infer and synthesize one procedure against the current registry
    pub fn synthesize_procedure(&mut self, procedure: &ProcedureDefinition, catalog: &TableCatalog) -> Synthesis {
        let inference = self.infer_procedure(procedure, catalog);
        let mut synthesis =
            self.synthesizer
                .synthesize_procedure(&procedure.name, &inference.columns, &mut self.registry);

        let mut diagnostics = inference.diagnostics;
        diagnostics.append(&mut synthesis.diagnostics);
        synthesis.diagnostics = diagnostics;
        synthesis
    }

    fn collect(output: &mut PipelineOutput, synthesis: Synthesis) {
        output.documents.push(synthesis.document);
        output.diagnostics.extend(synthesis.diagnostics);
    }
}

impl Default for SchemaPipeline {
    fn default() -> Self {
        Self::new(InferenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticMetadataSource;
    use crate::core::InferenceError;

    fn catalog() -> TableCatalog {
        TableCatalog::from_column_rows(vec![
            ("orders".into(), "id".into(), "int".into(), false),
            ("orders".into(), "total".into(), "money".into(), true),
        ])
    }

    struct FailingSource;

    impl MetadataSource for FailingSource {
        fn list_tables(&self) -> Result<TableCatalog> {
            Err(InferenceError::MetadataSource("connection refused".into()))
        }

        fn list_procedures(&self) -> Result<Vec<ProcedureDefinition>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_infer_procedure() {
        let pipeline = SchemaPipeline::default();
        let procedure = ProcedureDefinition::new(
            "GetTotals",
            "CREATE PROCEDURE GetTotals @since INT AS BEGIN SET NOCOUNT ON; SELECT id, total, @since FROM orders; END",
        );

        let inference = pipeline.infer_procedure(&procedure, &catalog());

        let names: Vec<&str> = inference.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["id", "total"]);
        assert_eq!(inference.diagnostics.len(), 1);
        assert!(!inference.diagnostics[0].is_coverage_loss());
    }

    #[test]
    fn test_subquery_column_not_taken_from_outer_table() {
        let pipeline = SchemaPipeline::default();
        let procedure = ProcedureDefinition::new(
            "OrderTotals",
            "CREATE PROCEDURE OrderTotals AS BEGIN SELECT id, (SELECT MAX(total) FROM invoices) AS inv_max FROM orders; END",
        );

        let inference = pipeline.infer_procedure(&procedure, &catalog());

        let names: Vec<&str> = inference.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["id"]);
        assert!(matches!(
            &inference.diagnostics[..],
            [Diagnostic::UnresolvedColumn { reason: SkipReason::UnknownTable, .. }]
        ));
    }

    #[test]
    fn test_source_error_propagates() {
        let mut pipeline = SchemaPipeline::default();
        let err = pipeline.run(&FailingSource).unwrap_err();

        assert!(matches!(err, InferenceError::MetadataSource(_)));
    }

    #[test]
    fn test_run_splits_tables_and_procedures() {
        let source = StaticMetadataSource::new(catalog(), vec![
            ProcedureDefinition::new("A", "CREATE PROC A AS BEGIN SELECT id FROM orders END"),
            ProcedureDefinition::new("B", "CREATE PROC B AS BEGIN SELECT total FROM orders END"),
        ]);

        let output = SchemaPipeline::default().run(&source).unwrap();

        assert_eq!(output.table_documents().len(), 1);
        assert_eq!(output.procedure_documents().len(), 2);
        assert_eq!(output.coverage(), Coverage {
            tables: 1,
            procedures: 2,
            ..Coverage::default()
        });
    }

    #[test]
    fn test_reset_clears_registry() {
        let source = StaticMetadataSource::new(catalog(), vec![]);
        let mut pipeline = SchemaPipeline::default();
        pipeline.run(&source).unwrap();
        assert!(pipeline.registry().contains("#/definitions/orders"));

        pipeline.reset();

        assert!(pipeline.registry().get("#/definitions/orders").is_none());
    }
}
