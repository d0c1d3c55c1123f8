use rusqlite::types::Value;
use serde_json::{Map, Number, Value as JsonValue};

/// rows produced by a successful statement, column order preserved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// one json object per row keyed by column name
    pub fn to_records(&self) -> Vec<Map<String, JsonValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(to_json))
                    .collect()
            })
            .collect()
    }

    /// header line followed by one line per row, cells separated by tabs
    pub fn to_tsv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.columns.join("\t"));

        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(format_value).collect();
            lines.push(cells.join("\t"));
        }

        lines.join("\n")
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::from(*i),
        Value::Real(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Blob(b) => JsonValue::from(b.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ResultSet {
        ResultSet {
            columns: vec!["user_name".to_string(), "total".to_string()],
            rows: vec![
                vec![Value::Text("John Doe".to_string()), Value::Real(1699.98)],
                vec![Value::Text("Bob Johnson".to_string()), Value::Null],
            ],
        }
    }

    #[test]
    fn test_to_tsv_includes_header_and_rows() {
        let tsv = sample().to_tsv();
        let lines: Vec<&str> = tsv.lines().collect();

        assert_eq!(lines[0], "user_name\ttotal");
        assert_eq!(lines[1], "John Doe\t1699.98");
        assert_eq!(lines[2], "Bob Johnson\tNULL");
    }

    #[test]
    fn test_to_records_keys_by_column() {
        let records = sample().to_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["user_name"], json!("John Doe"));
        assert_eq!(records[1]["total"], JsonValue::Null);
    }

    #[test]
    fn test_empty_result_set_renders_header_only() {
        let rs = ResultSet {
            columns: vec!["id".to_string()],
            rows: vec![],
        };

        assert!(rs.is_empty());
        assert_eq!(rs.to_tsv(), "id");
    }
}
