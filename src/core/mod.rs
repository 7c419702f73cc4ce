pub mod diagnostics;
pub mod error;
pub mod types;

pub use diagnostics::{Diagnostic, SkipReason};
pub use error::{InferenceError, Result};
pub use types::{ColumnInfo, RawColumnRef, ResolvedColumn};
