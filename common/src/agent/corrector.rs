use crate::agent::parser::extract_sql;
use crate::agent::prompt::{build_prompt, Correction, SQL_SYSTEM_PROMPT};
use crate::db::{describe_schema, DatabaseGateway, ExecutionError, ResultSet};
use crate::error::{Nl2SqlError, Result};
use crate::llm::{CompletionGateway, Message};

pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// what happened when one generated statement was run
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Success(ResultSet),
    Failure(ExecutionError),
}

/// a single generate-and-execute round
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub index: usize,
    pub sql: String,
    pub outcome: ExecutionOutcome,
}

/// terminal state of one question
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Succeeded {
        sql: String,
        rows: ResultSet,
        attempts: usize,
    },
    Exhausted {
        last_sql: String,
        last_error: ExecutionError,
        attempts: usize,
    },
}

impl QueryResult {
    pub fn attempts(&self) -> usize {
        match self {
            QueryResult::Succeeded { attempts, .. } | QueryResult::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Succeeded { .. })
    }
}

/// turns questions into sql, feeding execution errors back to the model
/// until a statement runs or the attempt bound is reached
pub struct QueryCorrector<C> {
    gateway: C,
    max_attempts: usize,
}

impl<C: CompletionGateway> QueryCorrector<C> {
    pub fn new(gateway: C) -> Self {
        Self::with_max_attempts(gateway, DEFAULT_MAX_ATTEMPTS)
    }

    /// `max_attempts` below one is raised to one
    pub fn with_max_attempts(gateway: C, max_attempts: usize) -> Self {
        Self {
            gateway,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn gateway(&self) -> &C {
        &self.gateway
    }

    /// completion failures abort immediately and are not counted as attempts;
    /// execution failures never leave this function.
    #[tracing::instrument(skip(self, db), fields(max_attempts = self.max_attempts))]
    pub async fn answer<D>(&self, db: &D, question: &str) -> Result<QueryResult>
    where
        D: DatabaseGateway + ?Sized,
    {
        let mut correction: Option<Correction> = None;
        let mut index = 0;

        loop {
            index += 1;
            tracing::info!("sql generation attempt {}/{}", index, self.max_attempts);

            let schema_info = describe_schema(db).map_err(Nl2SqlError::Schema)?;
            let prompt = build_prompt(question, &schema_info, correction.as_ref());

            let response = self
                .gateway
                .complete(vec![
                    Message::system(SQL_SYSTEM_PROMPT),
                    Message::user(prompt),
                ])
                .await?;

            let attempt = match extract_sql(&response) {
                Ok(sql) => {
                    tracing::info!(attempt = index, sql = %sql, "generated sql");
                    let outcome = match db.execute(&sql) {
                        Ok(rows) => ExecutionOutcome::Success(rows),
                        Err(e) => ExecutionOutcome::Failure(e),
                    };
                    Attempt {
                        index,
                        sql,
                        outcome,
                    }
                }
                // no statement to run: hand the raw text back as the failed "sql"
                Err(e) => Attempt {
                    index,
                    sql: response.trim().to_string(),
                    outcome: ExecutionOutcome::Failure(e),
                },
            };

            match attempt.outcome {
                ExecutionOutcome::Success(rows) => {
                    tracing::info!(rows = rows.len(), "sql succeeded on attempt {}", index);
                    return Ok(QueryResult::Succeeded {
                        sql: attempt.sql,
                        rows,
                        attempts: index,
                    });
                }
                ExecutionOutcome::Failure(error) => {
                    tracing::warn!("attempt {} failed: {}", index, error);

                    if index >= self.max_attempts {
                        tracing::warn!("giving up after {} attempts", index);
                        return Ok(QueryResult::Exhausted {
                            last_sql: attempt.sql,
                            last_error: error,
                            attempts: index,
                        });
                    }

                    correction = Some(Correction {
                        sql: attempt.sql,
                        error: error.message().to_string(),
                    });
                }
            }
        }
    }
}
