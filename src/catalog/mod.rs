//! Table and procedure metadata consumed by inference.

pub mod source;
pub mod table;

pub use source::{MetadataSource, ProcedureDefinition, StaticMetadataSource};
pub use table::{ColumnRow, TableCatalog, TableColumns};
