use std::time::Duration;

use thiserror::Error;

use crate::ledger::LedgerError;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool '{name}' not found. Available tools: {known:?}")]
    UnknownTool { name: String, known: Vec<&'static str> },

    #[error("Tool '{tool}' is missing required field '{field}'")]
    MissingField { tool: &'static str, field: &'static str },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool '{tool}' exceeded its {limit:?} execution deadline")]
    Timeout { tool: &'static str, limit: Duration },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Result serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;
