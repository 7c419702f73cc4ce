// ============================================================================
// src/parser/adapter.rs - SELECT column extraction on top of sqlparser
// ============================================================================

use crate::config::InferenceConfig;
use crate::core::{InferenceError, RawColumnRef, Result};
use sqlparser::ast as sql_ast;
use sqlparser::ast::{Visit, Visitor};
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;
use std::collections::HashMap;
use std::convert::Infallible;
use std::ops::ControlFlow;

/// Turns one SELECT statement into the column references it returns
pub trait ColumnParser: Send + Sync {
    fn parse_select_columns(&self, sql: &str) -> Result<Vec<RawColumnRef>>;
}

pub struct SqlParserAdapter {
    dialect: Box<dyn Dialect + Send + Sync>,
    null_marker: String,
    variable_prefix: String,
}

impl SqlParserAdapter {
    pub fn new() -> Self {
        Self::with_config(&InferenceConfig::default())
    }

    pub fn with_config(config: &InferenceConfig) -> Self {
        Self {
            dialect: config.dialect.dialect(),
            null_marker: config.null_marker.clone(),
            variable_prefix: config.variable_prefix.clone(),
        }
    }

    fn collect_query(&self, query: &sql_ast::Query, out: &mut Vec<RawColumnRef>) {
        self.collect_set_expr(&query.body, out);
    }

    fn collect_set_expr(&self, body: &sql_ast::SetExpr, out: &mut Vec<RawColumnRef>) {
        match body {
            sql_ast::SetExpr::Select(select) => self.collect_select(select, out),
            sql_ast::SetExpr::Query(query) => self.collect_query(query, out),
            sql_ast::SetExpr::SetOperation { left, right, .. } => {
                self.collect_set_expr(left, out);
                self.collect_set_expr(right, out);
            }
            _ => {}
        }
    }

    fn collect_select(&self, select: &sql_ast::Select, out: &mut Vec<RawColumnRef>) {
        let scope = FromScope::from_tables(&select.from);

        for item in &select.projection {
            match item {
                sql_ast::SelectItem::UnnamedExpr(expr)
                | sql_ast::SelectItem::ExprWithAlias { expr, .. } => {
                    self.collect_expr(expr, &scope, out);
                }
                sql_ast::SelectItem::Wildcard(..) => {
                    out.extend(scope.tables.iter().map(|table| RawColumnRef::new(table.clone(), "*")));
                }
                sql_ast::SelectItem::QualifiedWildcard(
                    sql_ast::SelectItemQualifiedWildcardKind::ObjectName(name),
                    _,
                ) => {
                    out.push(RawColumnRef::new(scope.source_for(&object_name(name)), "*"));
                }
                // `expr.*` has no table behind it
                sql_ast::SelectItem::QualifiedWildcard(..) => {}
            }
        }
    }

    fn collect_expr(&self, expr: &sql_ast::Expr, scope: &FromScope, out: &mut Vec<RawColumnRef>) {
        let aggregate_fn = match expr {
            sql_ast::Expr::Function(func) => Some(func.name.to_string().to_uppercase()),
            _ => None,
        };

        let mut visitor = ProjectionVisitor {
            adapter: self,
            scope,
            aggregate_fn,
            query_depth: 0,
            out,
        };
        let ControlFlow::Continue(()) = expr.visit(&mut visitor);
    }

    fn bare_reference(&self, name: &str, scope: &FromScope) -> RawColumnRef {
        if name.starts_with(&self.variable_prefix) {
            return RawColumnRef::new(name, name);
        }

        match scope.single_table() {
            Some(table) => RawColumnRef::new(table, name),
            None => RawColumnRef::new(self.null_marker.clone(), name),
        }
    }
}

impl ColumnParser for SqlParserAdapter {
    fn parse_select_columns(&self, sql: &str) -> Result<Vec<RawColumnRef>> {
        let statements = Parser::parse_sql(&*self.dialect, sql)?;
        let mut columns = Vec::new();

        for statement in statements {
            match statement {
                sql_ast::Statement::Query(query) => self.collect_query(&query, &mut columns),
                other => {
                    return Err(InferenceError::UnsupportedStatement(format!(
                        "expected SELECT, got: {}",
                        other
                    )));
                }
            }
        }

        Ok(columns)
    }
}

impl Default for SqlParserAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the column references of one projection item.
///
/// Identifiers inside nested queries belong to those queries' FROM
/// clauses, so they are skipped while `query_depth > 0`. A scalar
/// subquery is collected separately with its own scope; `EXISTS` and
/// `IN (SELECT ..)` only yield a boolean and contribute nothing.
struct ProjectionVisitor<'a> {
    adapter: &'a SqlParserAdapter,
    scope: &'a FromScope,
    aggregate_fn: Option<String>,
    query_depth: usize,
    out: &'a mut Vec<RawColumnRef>,
}

impl Visitor for ProjectionVisitor<'_> {
    type Break = Infallible;

    fn pre_visit_query(&mut self, _query: &sql_ast::Query) -> ControlFlow<Self::Break> {
        self.query_depth += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &sql_ast::Query) -> ControlFlow<Self::Break> {
        self.query_depth -= 1;
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &sql_ast::Expr) -> ControlFlow<Self::Break> {
        if self.query_depth > 0 {
            return ControlFlow::Continue(());
        }

        let reference = match expr {
            sql_ast::Expr::Identifier(ident) => Some(self.adapter.bare_reference(&ident.value, self.scope)),
            sql_ast::Expr::CompoundIdentifier(idents) if idents.len() >= 2 => {
                let column = &idents[idents.len() - 1].value;
                let qualifier = &idents[idents.len() - 2].value;
                Some(RawColumnRef::new(self.scope.source_for(qualifier), column.clone()))
            }
            // Some dialects surface `@name` as a placeholder value
            sql_ast::Expr::Value(_) => {
                let rendered = expr.to_string();
                rendered
                    .starts_with(&self.adapter.variable_prefix)
                    .then(|| RawColumnRef::new(rendered.clone(), rendered))
            }
            sql_ast::Expr::Subquery(query) => {
                self.adapter.collect_query(query, self.out);
                None
            }
            _ => None,
        };

        if let Some(mut reference) = reference {
            reference.aggregate_fn = self.aggregate_fn.clone();
            self.out.push(reference);
        }

        ControlFlow::Continue(())
    }
}

/// Tables visible to a single SELECT, with alias -> table name
#[derive(Debug, Default)]
struct FromScope {
    tables: Vec<String>,
    aliases: HashMap<String, String>,
    /// Derived tables and other relations that are not catalog tables
    opaque_relations: usize,
}

impl FromScope {
    fn from_tables(from: &[sql_ast::TableWithJoins]) -> Self {
        let mut scope = Self::default();
        for table in from {
            scope.add_table_with_joins(table);
        }
        scope
    }

    fn add_table_with_joins(&mut self, table: &sql_ast::TableWithJoins) {
        self.add_factor(&table.relation);
        for join in &table.joins {
            self.add_factor(&join.relation);
        }
    }

    fn add_factor(&mut self, factor: &sql_ast::TableFactor) {
        match factor {
            sql_ast::TableFactor::Table { name, alias, .. } => {
                let table = object_name(name);
                if let Some(alias) = alias {
                    self.aliases.insert(alias.name.value.clone(), table.clone());
                }
                self.tables.push(table);
            }
            sql_ast::TableFactor::NestedJoin { table_with_joins, .. } => {
                self.add_table_with_joins(table_with_joins);
            }
            _ => self.opaque_relations += 1,
        }
    }

    /// Table behind a qualifier; unknown qualifiers pass through unchanged
    fn source_for(&self, qualifier: &str) -> String {
        self.aliases
            .get(qualifier)
            .cloned()
            .unwrap_or_else(|| qualifier.to_string())
    }

    fn single_table(&self) -> Option<String> {
        match (self.tables.as_slice(), self.opaque_relations) {
            ([table], 0) => Some(table.clone()),
            _ => None,
        }
    }
}

/// Terminal name of a possibly schema-qualified object, without quoting
fn object_name(name: &sql_ast::ObjectName) -> String {
    name.0
        .last()
        .map(|part| unquote(&part.to_string()).to_string())
        .unwrap_or_default()
}

fn unquote(ident: &str) -> &str {
    for (open, close) in [('[', ']'), ('"', '"'), ('`', '`')] {
        if let Some(inner) = ident.strip_prefix(open).and_then(|s| s.strip_suffix(close)) {
            return inner;
        }
    }
    ident
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Vec<RawColumnRef> {
        SqlParserAdapter::new().parse_select_columns(sql).unwrap()
    }

    #[test]
    fn test_single_table_bare_columns() {
        let columns = parse("SELECT id, total FROM orders");

        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "id"),
            RawColumnRef::new("orders", "total"),
        ]);
    }

    #[test]
    fn test_alias_maps_to_table() {
        let columns = parse(
            "SELECT o.id, c.name FROM dbo.orders o JOIN customers AS c ON o.customer_id = c.id"
        );

        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "id"),
            RawColumnRef::new("customers", "name"),
        ]);
    }

    #[test]
    fn test_bare_column_with_join_is_ambiguous() {
        let columns = parse("SELECT name FROM orders o JOIN customers c ON o.customer_id = c.id");

        assert_eq!(columns, vec![RawColumnRef::new("null", "name")]);
    }

    #[test]
    fn test_aggregate_function_name() {
        let columns = parse("SELECT COUNT(o.id), MAX(total) FROM orders o");

        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "id").with_aggregate("COUNT"),
            RawColumnRef::new("orders", "total").with_aggregate("MAX"),
        ]);
    }

    #[test]
    fn test_constants_yield_nothing() {
        assert!(parse("SELECT 1").is_empty());
        assert!(parse("SELECT 'x' AS label FROM orders").is_empty());
    }

    #[test]
    fn test_variables() {
        let columns = parse("SELECT @p1");

        assert_eq!(columns, vec![RawColumnRef::new("@p1", "@p1")]);
    }

    #[test]
    fn test_wildcards() {
        let columns = parse("SELECT * FROM orders o JOIN customers c ON o.customer_id = c.id");
        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "*"),
            RawColumnRef::new("customers", "*"),
        ]);

        let columns = parse("SELECT c.* FROM orders o JOIN customers c ON o.customer_id = c.id");
        assert_eq!(columns, vec![RawColumnRef::new("customers", "*")]);
    }

    #[test]
    fn test_schema_qualified_wildcard() {
        let columns = parse("SELECT [dbo].[orders].* FROM [dbo].[orders]");

        assert_eq!(columns, vec![RawColumnRef::new("orders", "*")]);
    }

    #[test]
    fn test_scalar_subquery_uses_its_own_from() {
        let columns = parse(
            "SELECT o.id, (SELECT MAX(total) FROM invoices) AS inv_max FROM orders o"
        );

        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "id"),
            RawColumnRef::new("invoices", "total").with_aggregate("MAX"),
        ]);
    }

    #[test]
    fn test_subquery_alias_stays_inside_subquery() {
        let columns = parse(
            "SELECT o.id, (SELECT c.name FROM customers c WHERE c.id = o.customer_id) AS customer_name \
             FROM orders o"
        );

        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "id"),
            RawColumnRef::new("customers", "name"),
        ]);
    }

    #[test]
    fn test_exists_subquery_contributes_nothing() {
        let columns = parse(
            "SELECT o.id, CASE WHEN EXISTS (SELECT total FROM invoices i WHERE i.order_id = o.id) \
             THEN 1 ELSE 0 END AS invoiced FROM orders o"
        );

        assert_eq!(columns, vec![RawColumnRef::new("orders", "id")]);
    }

    #[test]
    fn test_union_branches() {
        let columns = parse("SELECT id FROM orders UNION ALL SELECT id FROM archived_orders");

        assert_eq!(columns, vec![
            RawColumnRef::new("orders", "id"),
            RawColumnRef::new("archived_orders", "id"),
        ]);
    }

    #[test]
    fn test_bracket_quoted_names() {
        let columns = parse("SELECT [o].[id] FROM [dbo].[orders] AS [o]");

        assert_eq!(columns, vec![RawColumnRef::new("orders", "id")]);
    }

    #[test]
    fn test_derived_table_is_not_single_table() {
        let columns = parse("SELECT id FROM (SELECT id FROM orders) d");

        assert_eq!(columns, vec![RawColumnRef::new("null", "id")]);
    }

    #[test]
    fn test_non_select_is_rejected() {
        let err = SqlParserAdapter::new()
            .parse_select_columns("DELETE FROM orders WHERE id = 1")
            .unwrap_err();

        assert!(matches!(err, InferenceError::UnsupportedStatement(_)));
    }

    #[test]
    fn test_syntax_error() {
        let err = SqlParserAdapter::new()
            .parse_select_columns("SELECT id FROM orders WHERE")
            .unwrap_err();

        assert!(matches!(err, InferenceError::ParseError(_)));
    }
}
