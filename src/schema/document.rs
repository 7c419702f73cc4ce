use crate::core::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

pub const DATE_TIME_FORMAT: &str = "date-time";
pub const OBJECT_TYPE: &str = "object";

/// JSON Schema primitive type a column maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// One entry under `properties`
///
/// Either inline (`type`, optionally `format`) or a `$ref` to a property of
/// another registered document, with a `description` saying where it points.
/// A procedure column of unmapped type carries neither `type` nor `$ref`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub json_type: Option<JsonType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySchema {
    pub fn typed(json_type: Option<JsonType>) -> Self {
        Self {
            json_type,
            ..Self::default()
        }
    }

    pub fn reference(pointer: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            reference: Some(pointer.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// A draft-07 object schema describing one table or procedure row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(rename = "$schema")]
    pub schema: String,

    #[serde(rename = "$id")]
    pub id: String,

    pub title: String,

    #[serde(rename = "type")]
    pub schema_type: String,

    pub properties: IndexMap<String, PropertySchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl SchemaDocument {
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// JSON pointer to one of this document's properties
    pub fn property_pointer(&self, name: &str) -> String {
        format!("{}/properties/{}", self.id, name)
    }

    pub fn to_json_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    /// Two-space indented JSON, the form handed to code generators
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
