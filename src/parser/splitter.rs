use super::adapter::ColumnParser;
use crate::core::{Diagnostic, RawColumnRef};
use tracing::{Level, event};

const STATEMENT_TERMINATOR: char = ';';
const PREVIEW_CHARS: usize = 50;

/// Column references gathered from every SELECT in a procedure body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnCollection {
    pub columns: Vec<RawColumnRef>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split a body on `;` and keep the candidates that start with `SELECT`
/// (case-insensitive), trimmed, in source order.
pub fn split_select_statements(body: &str) -> Vec<&str> {
    body.split(STATEMENT_TERMINATOR)
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .filter(|stmt| starts_with_select(stmt))
        .collect()
}

/// Run every SELECT statement of `body` through `parser`.
///
/// A statement that fails to parse is logged, recorded as a diagnostic and
/// contributes no columns; the remaining statements are still processed.
pub fn collect_column_refs(entity: &str, body: &str, parser: &dyn ColumnParser) -> ColumnCollection {
    let mut collection = ColumnCollection::default();

    for statement in split_select_statements(body) {
        match parser.parse_select_columns(statement) {
            Ok(columns) => collection.columns.extend(columns),
            Err(err) => {
                let preview = preview(statement);
                event!(
                    Level::WARN,
                    entity = %entity,
                    error = %err,
                    "could not parse statement: {}...",
                    preview
                );
                collection.diagnostics.push(Diagnostic::StatementParseFailure {
                    entity: entity.to_string(),
                    statement: preview,
                    reason: err.to_string(),
                });
            }
        }
    }

    collection
}

fn starts_with_select(statement: &str) -> bool {
    statement
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

fn preview(statement: &str) -> String {
    statement.chars().take(PREVIEW_CHARS).collect()
}
