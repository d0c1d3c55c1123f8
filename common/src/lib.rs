pub mod agent;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod report;
pub mod tracing;

pub use error::{Nl2SqlError, Result};
