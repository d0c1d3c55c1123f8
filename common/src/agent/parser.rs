use crate::db::ExecutionError;
use once_cell::sync::Lazy;
use regex::Regex;

static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]*[ \t]*\r?\n)?(.*?)```").unwrap()
});

static STATEMENT_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    // a leading WITH only counts when it opens a cte, so prose like
    // "With the given schema..." is skipped
    Regex::new(
        r"(?im)^[ \t]*(?:(?:select|insert|update|delete|create|drop|alter|pragma|explain|replace|values)\b|with\s+(?:recursive\b|\S+?\s*(?:\([^)]*\))?\s*as\s*\())",
    )
    .unwrap()
});

/// reduce a model response to the sql it contains.
///
/// markdown fences and leading prose are dropped; a response with nothing
/// resembling a statement is a `NoSql` error so the caller can retry.
pub fn extract_sql(response: &str) -> Result<String, ExecutionError> {
    let text = response.trim();

    if text.is_empty() {
        return Err(ExecutionError::NoSql(
            "model returned empty output".to_string(),
        ));
    }

    // fenced block wins, an unterminated opening fence is just stripped
    let text = match FENCE_REGEX.captures(text) {
        Some(captures) => captures.get(1).map(|m| m.as_str()).unwrap_or(text),
        None if text.starts_with("```") => text
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or(""),
        None => text,
    };

    let mat = STATEMENT_START_REGEX.find(text).ok_or_else(|| {
        ExecutionError::NoSql("model output did not contain a sql statement".to_string())
    })?;

    let sql = text[mat.start()..].trim();

    Ok(sql.to_string())
}
