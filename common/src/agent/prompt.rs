pub const SQL_SYSTEM_PROMPT: &str =
    "You are a SQL expert that converts questions to accurate SQL queries.";

const OUTPUT_RULE: &str =
    "Return ONLY the SQL query with no additional explanation or formatting.";

/// the statement that failed on the previous attempt and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub sql: String,
    pub error: String,
}

pub fn build_prompt(question: &str, schema_info: &str, correction: Option<&Correction>) -> String {
    match correction {
        None => format!(
            "Convert this natural language question into a SQL query for SQLite:\n\
             Question: {}\n\
             Database schema:\n{}\n\n\
             {}",
            question, schema_info, OUTPUT_RULE
        ),
        Some(previous) => format!(
            "The previous SQL query failed.\n\
             Previous SQL:\n{}\n\
             Error: {}\n\
             Please correct the SQL query for this question: {}\n\
             Database schema:\n{}\n\n\
             {}",
            previous.sql, previous.error, question, schema_info, OUTPUT_RULE
        ),
    }
}
