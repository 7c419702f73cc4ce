//! Procedure text handling: body extraction, statement splitting and the
//! SELECT column parser seam.

mod adapter;
mod extract;
mod splitter;

pub use adapter::{ColumnParser, SqlParserAdapter};
pub use extract::extract_procedure_body;
pub use splitter::{ColumnCollection, collect_column_refs, split_select_statements};
