pub mod database;
pub mod result;
pub mod schema;

pub use database::Database;
pub use result::ResultSet;
pub use schema::{describe_schema, TableSchema};

use thiserror::Error;

/// failure of a single generated statement. the message is kept verbatim so it
/// can be handed back to the model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// error text reported by the database engine
    #[error("{0}")]
    Engine(String),

    /// the model response did not contain anything executable
    #[error("{0}")]
    NoSql(String),
}

impl ExecutionError {
    pub fn message(&self) -> &str {
        match self {
            ExecutionError::Engine(msg) | ExecutionError::NoSql(msg) => msg,
        }
    }
}

impl From<rusqlite::Error> for ExecutionError {
    /// keeps sqlite's own message, without rusqlite's sql/offset decoration
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqlInputError { msg, .. } => ExecutionError::Engine(msg),
            rusqlite::Error::SqliteFailure(_, Some(msg)) => ExecutionError::Engine(msg),
            other => ExecutionError::Engine(other.to_string()),
        }
    }
}

/// sql-in, rows-or-error-out boundary used by the query corrector
pub trait DatabaseGateway {
    /// tables and columns currently visible to generated queries
    fn schema(&self) -> std::result::Result<Vec<TableSchema>, ExecutionError>;

    /// run one statement and collect every row it yields
    fn execute(&self, sql: &str) -> std::result::Result<ResultSet, ExecutionError>;
}
