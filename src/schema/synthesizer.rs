use super::document::{JsonType, OBJECT_TYPE, PropertySchema, SchemaDocument};
use super::registry::SchemaRegistry;
use super::type_map::{date_time_format, map_db_type};
use super::validator::SchemaValidator;
use crate::catalog::TableColumns;
use crate::config::InferenceConfig;
use crate::core::{Diagnostic, ResolvedColumn};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{Level, event};

/// A registered document plus what went wrong building it
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub document: Arc<SchemaDocument>,
    pub diagnostics: Vec<Diagnostic>,
}

/// What to do with a column type missing from the type map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnmappedType {
    /// Table columns fall back to `string`
    DefaultToString,
    /// Procedure columns get a property with no `type` at all
    Omit,
}

/// Builds schema documents and registers them
pub struct SchemaSynthesizer {
    config: InferenceConfig,
    validator: SchemaValidator,
}

impl SchemaSynthesizer {
    pub fn new(config: InferenceConfig) -> Self {
        Self::with_validator(config, SchemaValidator::new())
    }

    pub fn with_validator(config: InferenceConfig, validator: SchemaValidator) -> Self {
        Self { config, validator }
    }

    /// Schema for a table, straight from its catalog entry
    pub fn synthesize_table(
        &self,
        table_name: &str,
        columns: &TableColumns,
        registry: &mut SchemaRegistry,
    ) -> Synthesis {
        let mut builder = PropertiesBuilder::default();

        for (name, info) in columns {
            let property = inline_property(&info.db_type, UnmappedType::DefaultToString);
            builder.push(name, property, info.nullable);
        }

        self.finish(table_name, builder, registry)
    }

    /// Schema for a procedure result row.
    ///
    /// A column whose table already has a registered schema declaring the
    /// same property becomes a `$ref` to that property. Only schemas present
    /// in `registry` at call time are considered.
    pub fn synthesize_procedure(
        &self,
        procedure_name: &str,
        columns: &[ResolvedColumn],
        registry: &mut SchemaRegistry,
    ) -> Synthesis {
        let mut builder = PropertiesBuilder::default();

        for column in columns {
            let property = self
                .table_reference(column, registry)
                .unwrap_or_else(|| inline_property(&column.db_type, UnmappedType::Omit));
            builder.push(&column.column, property, column.nullable);
        }

        self.finish(procedure_name, builder, registry)
    }

    fn table_reference(&self, column: &ResolvedColumn, registry: &SchemaRegistry) -> Option<PropertySchema> {
        let table_id = self.config.schema_id(&column.table);
        let table_doc = registry.get(&table_id)?;
        table_doc.property(&column.column)?;

        Some(PropertySchema::reference(
            table_doc.property_pointer(&column.column),
            format!("{} from table {}", column.column, column.table),
        ))
    }

    fn finish(&self, entity_name: &str, builder: PropertiesBuilder, registry: &mut SchemaRegistry) -> Synthesis {
        let document = Arc::new(SchemaDocument {
            schema: self.config.schema_uri.clone(),
            id: self.config.schema_id(entity_name),
            title: entity_name.to_string(),
            schema_type: OBJECT_TYPE.to_string(),
            properties: builder.properties,
            required: builder.required,
        });

        let mut diagnostics = Vec::new();
        if self.config.self_check
            && let Err(err) = self.validator.validate(&document)
        {
            event!(Level::WARN, schema_id = %document.id, error = %err, "schema self-check failed");
            diagnostics.push(Diagnostic::SchemaSelfCheckFailure {
                schema_id: document.id.clone(),
                reason: err.to_string(),
            });
        }

        registry.insert(Arc::clone(&document));

        Synthesis { document, diagnostics }
    }
}

impl Default for SchemaSynthesizer {
    fn default() -> Self {
        Self::new(InferenceConfig::default())
    }
}

#[derive(Debug, Default)]
struct PropertiesBuilder {
    properties: IndexMap<String, PropertySchema>,
    required: Vec<String>,
}

impl PropertiesBuilder {
    /// A repeated name keeps its first position and takes the latest schema
    fn push(&mut self, name: &str, property: PropertySchema, nullable: bool) {
        self.properties.insert(name.to_string(), property);

        if !nullable && !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }
}

fn inline_property(db_type: &str, unmapped: UnmappedType) -> PropertySchema {
    let json_type = match (map_db_type(db_type), unmapped) {
        (Some(json_type), _) => Some(json_type),
        (None, UnmappedType::DefaultToString) => Some(JsonType::String),
        (None, UnmappedType::Omit) => None,
    };

    let property = PropertySchema::typed(json_type);
    match date_time_format(db_type) {
        Some(format) => property.with_format(format),
        None => property,
    }
}
