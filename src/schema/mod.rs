//! JSON Schema synthesis
//!
//! - `document.rs` - SchemaDocument / PropertySchema serde model
//! - `type_map.rs` - SQL type -> JSON type and `date-time` format policy
//! - `synthesizer.rs` - builds table and procedure documents
//! - `validator.rs` - structural self-check rules
//! - `registry.rs` - documents synthesized so far, by `$id`

mod document;
mod registry;
mod synthesizer;
mod type_map;
mod validator;

pub use document::{DATE_TIME_FORMAT, JsonType, PropertySchema, SchemaDocument};
pub use registry::SchemaRegistry;
pub use synthesizer::{SchemaSynthesizer, Synthesis};
pub use type_map::{date_time_format, map_db_type};
pub use validator::{PropertiesRule, RequiredRule, RootShapeRule, SchemaValidator, ValidationRule};
