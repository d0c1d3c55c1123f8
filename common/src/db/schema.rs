use crate::db::{DatabaseGateway, ExecutionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
    /// `Table <name> columns: <col> <TYPE>, ...`
    pub fn describe(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.declared_type.is_empty() {
                    c.name.clone()
                } else {
                    format!("{} {}", c.name, c.declared_type)
                }
            })
            .collect();

        format!("Table {} columns: {}", self.table, columns.join(", "))
    }
}

/// schema text embedded in every prompt, one line per table
pub fn describe_schema<D: DatabaseGateway + ?Sized>(db: &D) -> Result<String, ExecutionError> {
    let tables = db.schema()?;
    let lines: Vec<String> = tables.iter().map(TableSchema::describe).collect();
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_describe_table() {
        let table = TableSchema {
            table: "orders".to_string(),
            columns: vec![
                ColumnInfo {
                    name: "id".to_string(),
                    declared_type: "INTEGER".to_string(),
                },
                ColumnInfo {
                    name: "note".to_string(),
                    declared_type: String::new(),
                },
            ],
        };

        assert_eq!(table.describe(), "Table orders columns: id INTEGER, note");
    }

    #[test]
    fn test_describe_schema_from_database() {
        let db = Database::with_sample_data().unwrap();
        let text = describe_schema(&db).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("Table products columns: product_id INTEGER"));
        assert!(text.contains("Table users columns: user_id INTEGER, user_name TEXT"));
    }
}
