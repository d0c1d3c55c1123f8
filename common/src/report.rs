use crate::agent::QueryResult;
use crate::error::Result;

const BANNER: &str = "==================================================";

/// human readable outcome of one question
pub fn render_text(result: &QueryResult) -> String {
    let mut out = vec![BANNER.to_string()];

    match result {
        QueryResult::Succeeded {
            sql,
            rows,
            attempts,
        } => {
            out.push(format!("SUCCESS after {} {}", attempts, plural(*attempts)));
            out.push("Generated SQL:".to_string());
            out.push(sql.clone());
            out.push(String::new());
            out.push("Results:".to_string());
            out.push(rows.to_tsv());
        }
        QueryResult::Exhausted {
            last_sql,
            last_error,
            attempts,
        } => {
            out.push(format!("FAILED after {} {}", attempts, plural(*attempts)));
            out.push("Last SQL:".to_string());
            out.push(last_sql.clone());
            out.push(format!("Last error: {}", last_error));
        }
    }

    out.join("\n")
}

/// same information as a json document
pub fn render_json(question: &str, result: &QueryResult) -> Result<String> {
    let value = match result {
        QueryResult::Succeeded {
            sql,
            rows,
            attempts,
        } => serde_json::json!({
            "question": question,
            "success": true,
            "attempts": attempts,
            "sql": sql,
            "columns": rows.columns,
            "rows": rows.to_records(),
        }),
        QueryResult::Exhausted {
            last_sql,
            last_error,
            attempts,
        } => serde_json::json!({
            "question": question,
            "success": false,
            "attempts": attempts,
            "sql": last_sql,
            "error": last_error.message(),
        }),
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

fn plural(attempts: usize) -> &'static str {
    if attempts == 1 {
        "attempt"
    } else {
        "attempts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ExecutionError, ResultSet};
    use rusqlite::types::Value;

    fn success() -> QueryResult {
        QueryResult::Succeeded {
            sql: "SELECT COUNT(*) FROM orders;".to_string(),
            rows: ResultSet {
                columns: vec!["COUNT(*)".to_string()],
                rows: vec![vec![Value::Integer(5)]],
            },
            attempts: 1,
        }
    }

    fn exhausted() -> QueryResult {
        QueryResult::Exhausted {
            last_sql: "SELECT * FROM ordrs;".to_string(),
            last_error: ExecutionError::Engine("no such table: ordrs".to_string()),
            attempts: 3,
        }
    }

    #[test]
    fn test_render_success() {
        let text = render_text(&success());

        assert!(text.starts_with(BANNER));
        assert!(text.contains("SUCCESS after 1 attempt\n"));
        assert!(text.contains("Generated SQL:\nSELECT COUNT(*) FROM orders;\n"));
        assert!(text.ends_with("Results:\nCOUNT(*)\n5"));
    }

    #[test]
    fn test_render_exhausted_uses_raw_error() {
        let text = render_text(&exhausted());

        assert!(text.contains("FAILED after 3 attempts"));
        assert!(text.contains("Last SQL:\nSELECT * FROM ordrs;"));
        assert!(text.ends_with("Last error: no such table: ordrs"));
    }

    #[test]
    fn test_render_json() {
        let ok: serde_json::Value =
            serde_json::from_str(&render_json("how many?", &success()).unwrap()).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["rows"][0]["COUNT(*)"], 5);

        let failed: serde_json::Value =
            serde_json::from_str(&render_json("list", &exhausted()).unwrap()).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["error"], "no such table: ordrs");
    }
}
