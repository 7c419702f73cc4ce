use super::document::{PropertySchema, SchemaDocument};
use crate::core::{InferenceError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Schemas synthesized so far in a run, keyed by `$id`
///
/// Documents are shared behind `Arc` and never mutated once stored.
/// Inserting an existing `$id` replaces the entry. There is no iteration
/// API: callers that need every document keep their own list of ids.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    documents: HashMap<String, Arc<SchemaDocument>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document, returning whatever it replaced
    pub fn insert(&mut self, document: Arc<SchemaDocument>) -> Option<Arc<SchemaDocument>> {
        self.documents.insert(document.id.clone(), document)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<SchemaDocument>> {
        self.documents.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&Arc<SchemaDocument>> {
        self.get(id)
            .ok_or_else(|| InferenceError::SchemaNotFound(id.to_string()))
    }

    /// A property of a registered document
    pub fn property(&self, id: &str, name: &str) -> Option<&PropertySchema> {
        self.get(id).and_then(|doc| doc.property(name))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Drop every stored document
    pub fn reset(&mut self) {
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::{JsonType, OBJECT_TYPE};
    use indexmap::IndexMap;

    fn document(id: &str, title: &str) -> Arc<SchemaDocument> {
        let mut properties = IndexMap::new();
        properties.insert("id".to_string(), PropertySchema::typed(Some(JsonType::Integer)));

        Arc::new(SchemaDocument {
            schema: "http://json-schema.org/draft-07/schema#".into(),
            id: id.into(),
            title: title.into(),
            schema_type: OBJECT_TYPE.into(),
            properties,
            required: vec![],
        })
    }

    #[test]
    fn test_insert_and_get() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.insert(document("#/definitions/orders", "orders")).is_none());

        assert!(registry.contains("#/definitions/orders"));
        assert_eq!(registry.get("#/definitions/orders").unwrap().title, "orders");
        assert!(registry.property("#/definitions/orders", "id").is_some());
        assert!(registry.property("#/definitions/orders", "nope").is_none());
    }

    #[test]
    fn test_missing_id() {
        let registry = SchemaRegistry::new();

        assert!(registry.get("#/definitions/orders").is_none());
        let err = registry.require("#/definitions/orders").unwrap_err();
        assert!(matches!(err, InferenceError::SchemaNotFound(id) if id == "#/definitions/orders"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = SchemaRegistry::new();
        registry.insert(document("#/definitions/orders", "first"));

        let previous = registry.insert(document("#/definitions/orders", "second"));

        assert_eq!(previous.unwrap().title, "first");
        assert_eq!(registry.get("#/definitions/orders").unwrap().title, "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut registry = SchemaRegistry::new();
        registry.insert(document("#/definitions/orders", "orders"));
        registry.insert(document("#/definitions/customers", "customers"));

        registry.reset();

        assert!(registry.is_empty());
        assert!(registry.get("#/definitions/orders").is_none());
        assert!(registry.get("#/definitions/customers").is_none());
    }
}
