use crate::core::ColumnInfo;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Column name -> metadata, in declaration order
pub type TableColumns = IndexMap<String, ColumnInfo>;

/// One row of table introspection output: table, column, data type, nullable
pub type ColumnRow = (String, String, String, bool);

/// Table metadata loaded once per run
///
/// Read-only once built. Adding a table returns a new catalog and leaves
/// the old one untouched, so clones are cheap and never observe changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableCatalog {
    tables: Arc<IndexMap<String, TableColumns>>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold flat introspection rows into per-table column maps.
    ///
    /// Rows are expected ordered by table then column position; columns keep
    /// the order they arrive in.
    pub fn from_column_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = ColumnRow>,
    {
        let mut tables: IndexMap<String, TableColumns> = IndexMap::new();

        for (table_name, column_name, data_type, is_nullable) in rows {
            let info = ColumnInfo {
                db_type: data_type,
                nullable: is_nullable,
            };
            tables.entry(table_name).or_default().insert(column_name, info);
        }

        Self {
            tables: Arc::new(tables),
        }
    }

    /// Add or replace a table - returns a NEW catalog
    pub fn with_table(self, name: impl Into<String>, columns: TableColumns) -> Self {
        let mut new_tables = (*self.tables).clone();
        new_tables.insert(name.into(), columns);

        Self {
            tables: Arc::new(new_tables),
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableColumns> {
        self.tables.get(name)
    }

    pub fn column(&self, table: &str, column: &str) -> Option<&ColumnInfo> {
        self.tables.get(table).and_then(|cols| cols.get(column))
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables in load order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableColumns)> {
        self.tables.iter().map(|(name, cols)| (name.as_str(), cols))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(table: &str, column: &str, ty: &str, nullable: bool) -> ColumnRow {
        (table.into(), column.into(), ty.into(), nullable)
    }

    #[test]
    fn test_from_column_rows_preserves_order() {
        let catalog = TableCatalog::from_column_rows(vec![
            row("orders", "id", "int", false),
            row("orders", "placed_at", "datetime2", true),
            row("customers", "name", "nvarchar", false),
            row("orders", "total", "money", true),
        ]);

        assert_eq!(catalog.len(), 2);

        let names: Vec<&str> = catalog.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["orders", "customers"]);

        let orders = catalog.table("orders").unwrap();
        let columns: Vec<&str> = orders.keys().map(|k| k.as_str()).collect();
        assert_eq!(columns, vec!["id", "placed_at", "total"]);
        assert!(!orders["id"].nullable);
    }

    #[test]
    fn test_with_table_is_copy_on_write() {
        let original = TableCatalog::new();
        let snapshot = original.clone();

        let mut columns = TableColumns::new();
        columns.insert("id".into(), ColumnInfo::new("int").not_null());
        let extended = original.with_table("orders", columns);

        assert!(extended.table_exists("orders"));
        assert!(!snapshot.table_exists("orders"));
    }

    #[test]
    fn test_column_lookup() {
        let catalog = TableCatalog::from_column_rows(vec![row("orders", "id", "int", false)]);

        assert_eq!(catalog.column("orders", "id").unwrap().db_type, "int");
        assert!(catalog.column("orders", "missing").is_none());
        assert!(catalog.column("missing", "id").is_none());
    }

    #[test]
    fn test_deserialize_from_json() {
        let catalog: TableCatalog = serde_json::from_str(
            r#"{"orders": {"id": {"db_type": "int", "nullable": false}}}"#
        ).unwrap();

        assert_eq!(catalog.column("orders", "id"), Some(&ColumnInfo::new("int").not_null()));
    }
}
