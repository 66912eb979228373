use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::{Result, ToolError};
use crate::ledger::{ExpenseRow, Ledger};

const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// The closed set of tools the assistant may request.
///
/// Unknown names are rejected at the boundary; there is no runtime
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    AddExpense,
    GetExpenseHistory,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add_expense" => Some(ToolKind::AddExpense),
            "get_expense_history" => Some(ToolKind::GetExpenseHistory),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::AddExpense => "add_expense",
            ToolKind::GetExpenseHistory => "get_expense_history",
        }
    }

    pub fn names() -> Vec<&'static str> {
        vec!["add_expense", "get_expense_history"]
    }
}

/// Executes tool invocations against the ledger.
///
/// Every call runs under a wall-clock deadline enforced with a cancellable
/// future (`tokio::time::timeout`), so a hung ledger call cannot wedge the
/// dispatcher for subsequent requests.
pub struct ToolDispatcher {
    ledger: Arc<dyn Ledger>,
    tool_timeout: Duration,
}

impl ToolDispatcher {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Execute one tool call and serialize its structured result to JSON.
    pub async fn execute(&self, tool_name: &str, arguments: &Value) -> Result<String> {
        let Some(kind) = ToolKind::from_name(tool_name) else {
            return Err(ToolError::UnknownTool {
                name: tool_name.to_string(),
                known: ToolKind::names(),
            });
        };

        tracing::info!(tool = kind.name(), "executing tool");

        let handler = async {
            match kind {
                ToolKind::AddExpense => self.add_expense(arguments).await,
                ToolKind::GetExpenseHistory => self.get_expense_history(arguments).await,
            }
        };

        let result = tokio::time::timeout(self.tool_timeout, handler)
            .await
            .map_err(|_| ToolError::Timeout {
                tool: kind.name(),
                limit: self.tool_timeout,
            })??;

        let output = serde_json::to_string(&result)?;
        tracing::debug!(tool = kind.name(), bytes = output.len(), "tool succeeded");
        Ok(output)
    }

    async fn add_expense(&self, args: &Value) -> Result<Value> {
        const TOOL: &str = "add_expense";

        let workbook_id = require_str(args, TOOL, "workbook_id")?;
        let worksheet_name = require_str(args, TOOL, "worksheet_name")?;
        let amount_raw = args.get("amount").ok_or(ToolError::MissingField {
            tool: TOOL,
            field: "amount",
        })?;

        let row = ExpenseRow {
            date: require_str(args, TOOL, "date")?.to_string(),
            description: require_str(args, TOOL, "description")?.to_string(),
            category: require_str(args, TOOL, "category")?.to_string(),
            amount: coerce_amount(amount_raw)?,
        };

        self.ledger
            .append_expense(workbook_id, worksheet_name, &row)
            .await?;

        Ok(json!({
            "success": true,
            "message": "Despesa adicionada com sucesso",
            "data": row,
        }))
    }

    async fn get_expense_history(&self, args: &Value) -> Result<Value> {
        const TOOL: &str = "get_expense_history";

        let workbook_id = require_str(args, TOOL, "workbook_id")?;
        let worksheet_name = require_str(args, TOOL, "worksheet_name")?;
        let filters = match args.get("filters") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(_) => {
                return Err(ToolError::InvalidArguments(
                    "'filters' must be an object of field/value pairs".to_string(),
                ))
            }
        };

        let rows = self
            .ledger
            .read_history(workbook_id, worksheet_name)
            .await?;

        let mut expenses = Vec::with_capacity(rows.len());
        for row in &rows {
            expenses.push(serde_json::to_value(row)?);
        }

        // Post-hoc equality filter, AND-combined across keys.
        if let Some(filters) = filters {
            expenses.retain(|expense| {
                filters
                    .iter()
                    .all(|(key, expected)| expense.get(key) == Some(expected))
            });
        }

        Ok(json!({
            "success": true,
            "count": expenses.len(),
            "expenses": expenses,
        }))
    }
}

fn require_str<'a>(args: &'a Value, tool: &'static str, field: &'static str) -> Result<&'a str> {
    let value = args
        .get(field)
        .ok_or(ToolError::MissingField { tool, field })?;
    value.as_str().ok_or_else(|| {
        ToolError::InvalidArguments(format!("field '{}' must be a string", field))
    })
}

fn coerce_amount(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ToolError::InvalidArguments("'amount' is not a finite number".to_string())),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ToolError::InvalidArguments(format!("'amount' is not numeric: {:?}", s))
        }),
        other => Err(ToolError::InvalidArguments(format!(
            "'amount' must be a number, got {}",
            other
        ))),
    }
}
