pub mod corrector;
pub mod parser;
pub mod prompt;

pub use corrector::{Attempt, ExecutionOutcome, QueryCorrector, QueryResult, DEFAULT_MAX_ATTEMPTS};
pub use parser::extract_sql;
pub use prompt::{build_prompt, Correction, SQL_SYSTEM_PROMPT};
