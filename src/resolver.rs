//! Column provenance resolution
//!
//! Matches parser-emitted column references against table metadata. Only a
//! hit on both the table and the column produces a [`ResolvedColumn`]; every
//! other reference is dropped and recorded as a diagnostic.

use crate::catalog::TableCatalog;
use crate::config::InferenceConfig;
use crate::core::{Diagnostic, RawColumnRef, ResolvedColumn, SkipReason};
use tracing::{Level, event};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub columns: Vec<ResolvedColumn>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    fn skip(&mut self, entity: &str, reference: &RawColumnRef, reason: SkipReason) {
        event!(Level::DEBUG, entity = %entity, column = %reference, reason = %reason, "dropping column reference");
        self.diagnostics.push(Diagnostic::UnresolvedColumn {
            entity: entity.to_string(),
            reference: reference.clone(),
            reason,
        });
    }
}

/// Resolve `references` for `entity` against `catalog`, preserving order.
pub fn resolve_columns(
    entity: &str,
    references: &[RawColumnRef],
    catalog: &TableCatalog,
    config: &InferenceConfig,
) -> Resolution {
    let mut resolution = Resolution::default();

    for reference in references {
        if reference.source_tag == config.null_marker {
            resolution.skip(entity, reference, SkipReason::NullSource);
            continue;
        }

        if reference.source_tag.starts_with(&config.variable_prefix) {
            resolution.skip(entity, reference, SkipReason::Variable);
            continue;
        }

        let Some(table) = catalog.table(&reference.source_tag) else {
            resolution.skip(entity, reference, SkipReason::UnknownTable);
            continue;
        };

        if reference.is_wildcard() && config.expand_wildcards {
            resolution.columns.extend(
                table
                    .iter()
                    .map(|(name, info)| ResolvedColumn::from_catalog(&reference.source_tag, name, info)),
            );
            continue;
        }

        match table.get(&reference.column_name) {
            Some(info) => resolution.columns.push(ResolvedColumn::from_catalog(
                &reference.source_tag,
                &reference.column_name,
                info,
            )),
            None => resolution.skip(entity, reference, SkipReason::UnknownColumn),
        }
    }

    resolution
}
