//! Schema Document Self-Check
//!
//! Structural checks of a synthesized document against the draft-07
//! meta-rules that matter for code generators. Uses the Chain of
//! Responsibility pattern: each rule inspects the serialized document and
//! the first failing rule stops the chain.

use super::document::{OBJECT_TYPE, SchemaDocument};
use crate::core::{InferenceError, Result};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;

const PRIMITIVE_TYPES: [&str; 7] = ["array", "boolean", "integer", "null", "number", "object", "string"];

/// Trait for validation rules (Chain of Responsibility pattern)
pub trait ValidationRule: Send + Sync {
    fn validate(&self, document: &JsonValue) -> Result<()>;
}

/// Root is an object schema with string `$schema`, `$id` and `title`
#[derive(Debug, Clone, Default)]
pub struct RootShapeRule;

impl ValidationRule for RootShapeRule {
    fn validate(&self, document: &JsonValue) -> Result<()> {
        let root = as_object(document, "document")?;

        for key in ["$schema", "$id", "title"] {
            match root.get(key) {
                Some(JsonValue::String(_)) => {}
                Some(_) => return Err(violation(format!("'{}' must be a string", key))),
                None => return Err(violation(format!("missing '{}'", key))),
            }
        }

        if root.get("$id").and_then(JsonValue::as_str).is_some_and(str::is_empty) {
            return Err(violation("'$id' cannot be empty"));
        }

        match root.get("type").and_then(JsonValue::as_str) {
            Some(OBJECT_TYPE) => Ok(()),
            Some(other) => Err(violation(format!("root type must be 'object', got '{}'", other))),
            None => Err(violation("missing root 'type'")),
        }
    }
}

/// Every property is a schema object with well-typed keywords
#[derive(Debug, Clone, Default)]
pub struct PropertiesRule;

impl ValidationRule for PropertiesRule {
    fn validate(&self, document: &JsonValue) -> Result<()> {
        let Some(properties) = document.get("properties") else {
            return Ok(());
        };
        let properties = as_object(properties, "properties")?;

        for (name, property) in properties {
            let property = as_object(property, &format!("property '{}'", name))?;

            if let Some(ty) = property.get("type") {
                let known = ty.as_str().is_some_and(|t| PRIMITIVE_TYPES.contains(&t));
                if !known {
                    return Err(violation(format!("property '{}' has invalid type {}", name, ty)));
                }
            }

            for key in ["format", "$ref", "description"] {
                if property.get(key).is_some_and(|v| !v.is_string()) {
                    return Err(violation(format!("property '{}': '{}' must be a string", name, key)));
                }
            }

            if property.contains_key("type") && property.contains_key("$ref") {
                return Err(violation(format!("property '{}' has both 'type' and '$ref'", name)));
            }
        }

        Ok(())
    }
}

/// `required` lists unique, declared property names
#[derive(Debug, Clone, Default)]
pub struct RequiredRule;

impl ValidationRule for RequiredRule {
    fn validate(&self, document: &JsonValue) -> Result<()> {
        let Some(required) = document.get("required") else {
            return Ok(());
        };
        let JsonValue::Array(names) = required else {
            return Err(violation("'required' must be an array"));
        };

        let declared = document.get("properties").and_then(JsonValue::as_object);
        let mut seen = HashSet::new();

        for name in names {
            let Some(name) = name.as_str() else {
                return Err(violation("'required' entries must be strings"));
            };
            if !seen.insert(name) {
                return Err(violation(format!("'{}' is listed twice in 'required'", name)));
            }
            if !declared.is_some_and(|props| props.contains_key(name)) {
                return Err(violation(format!("required property '{}' is not declared", name)));
            }
        }

        Ok(())
    }
}

/// Runs the rule chain over a document
pub struct SchemaValidator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl SchemaValidator {
    /// Create validator with default rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RootShapeRule),
                Box::new(PropertiesRule),
                Box::new(RequiredRule),
            ],
        }
    }

    /// Create validator with custom rules
    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { rules }
    }

    pub fn validate(&self, document: &SchemaDocument) -> Result<()> {
        let value = document.to_json_value()?;
        self.validate_value(&value)
    }

    pub fn validate_value(&self, document: &JsonValue) -> Result<()> {
        for rule in &self.rules {
            rule.validate(document)?;
        }
        Ok(())
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn as_object<'a>(value: &'a JsonValue, what: &str) -> Result<&'a Map<String, JsonValue>> {
    value
        .as_object()
        .ok_or_else(|| violation(format!("{} must be an object", what)))
}

fn violation(message: impl Into<String>) -> InferenceError {
    InferenceError::SchemaValidation(message.into())
}
