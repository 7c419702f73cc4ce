//! Non-fatal findings collected while inferring schemas.
//!
//! None of these abort a run. They let a caller report partial coverage
//! (statements that failed to parse, columns that were dropped, documents
//! that failed their self-check) without changing what gets emitted.

use super::types::RawColumnRef;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The reference has no table in scope (constants, ambiguous columns).
    NullSource,
    /// The reference names a session variable or parameter.
    Variable,
    UnknownTable,
    UnknownColumn,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NullSource => "no source table",
            SkipReason::Variable => "variable reference",
            SkipReason::UnknownTable => "unknown table",
            SkipReason::UnknownColumn => "unknown column",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    StatementParseFailure {
        entity: String,
        statement: String,
        reason: String,
    },
    UnresolvedColumn {
        entity: String,
        reference: RawColumnRef,
        reason: SkipReason,
    },
    SchemaSelfCheckFailure {
        schema_id: String,
        reason: String,
    },
}

impl Diagnostic {
    /// Dropping null-sourced and variable references is the normal path for
    /// constants and parameters, so those are not treated as lost coverage.
    pub fn is_coverage_loss(&self) -> bool {
        match self {
            Diagnostic::UnresolvedColumn { reason, .. } => {
                matches!(reason, SkipReason::UnknownTable | SkipReason::UnknownColumn)
            }
            _ => true,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::StatementParseFailure { entity, statement, reason } => {
                write!(f, "{}: could not parse statement '{}': {}", entity, statement, reason)
            }
            Diagnostic::UnresolvedColumn { entity, reference, reason } => {
                write!(f, "{}: dropped column {} ({})", entity, reference, reason)
            }
            Diagnostic::SchemaSelfCheckFailure { schema_id, reason } => {
                write!(f, "{}: schema self-check failed: {}", schema_id, reason)
            }
        }
    }
}
