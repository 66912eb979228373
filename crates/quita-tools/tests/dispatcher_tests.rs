use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quita_tools::{ExpenseRow, Ledger, LedgerError, MemoryLedger, ToolDispatcher, ToolError};
use serde_json::{json, Value};

fn lunch_args() -> Value {
    json!({
        "workbook_id": "wb-1",
        "worksheet_name": "Despesas",
        "date": "2025-10-21",
        "description": "Almoço",
        "category": "Alimentação",
        "amount": 12.5,
    })
}

#[tokio::test]
async fn add_expense_appends_row_and_reports_success() {
    let ledger = Arc::new(MemoryLedger::new());
    let dispatcher = ToolDispatcher::new(ledger.clone());

    let output = dispatcher.execute("add_expense", &lunch_args()).await.unwrap();
    let result: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(result["success"], true);
    assert_eq!(result["data"]["amount"], 12.5);

    let rows = ledger.read_history("wb-1", "Despesas").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Almoço");
}

#[tokio::test]
async fn add_expense_coerces_string_amounts() {
    let ledger = Arc::new(MemoryLedger::new());
    let dispatcher = ToolDispatcher::new(ledger.clone());

    let mut args = lunch_args();
    args["amount"] = json!("12.50");
    dispatcher.execute("add_expense", &args).await.unwrap();

    let rows = ledger.read_history("wb-1", "Despesas").await.unwrap();
    assert_eq!(rows[0].amount, 12.5);
}

#[tokio::test]
async fn add_expense_rejects_missing_fields() {
    let dispatcher = ToolDispatcher::new(Arc::new(MemoryLedger::new()));

    let mut args = lunch_args();
    args.as_object_mut().unwrap().remove("category");
    let error = dispatcher.execute("add_expense", &args).await.unwrap_err();

    match error {
        ToolError::MissingField { tool, field } => {
            assert_eq!(tool, "add_expense");
            assert_eq!(field, "category");
        }
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[tokio::test]
async fn add_expense_rejects_non_numeric_amount() {
    let dispatcher = ToolDispatcher::new(Arc::new(MemoryLedger::new()));

    let mut args = lunch_args();
    args["amount"] = json!("caro demais");
    let error = dispatcher.execute("add_expense", &args).await.unwrap_err();

    assert!(matches!(error, ToolError::InvalidArguments(_)));
}

#[tokio::test]
async fn unknown_tool_is_rejected_with_known_names() {
    let dispatcher = ToolDispatcher::new(Arc::new(MemoryLedger::new()));

    let error = dispatcher
        .execute("transfer_funds", &json!({}))
        .await
        .unwrap_err();

    match error {
        ToolError::UnknownTool { name, known } => {
            assert_eq!(name, "transfer_funds");
            assert!(known.contains(&"add_expense"));
            assert!(known.contains(&"get_expense_history"));
        }
        other => panic!("expected UnknownTool, got {:?}", other),
    }
}

#[tokio::test]
async fn history_filter_is_exact_match_and_combined() {
    let ledger = Arc::new(MemoryLedger::new());
    ledger
        .seed(
            "wb-1",
            "Despesas",
            vec![
                ExpenseRow {
                    date: "2025-10-20".into(),
                    description: "Mercado".into(),
                    category: "Food".into(),
                    amount: 87.3,
                },
                ExpenseRow {
                    date: "2025-10-21".into(),
                    description: "Almoço".into(),
                    category: "Food".into(),
                    amount: 12.5,
                },
                ExpenseRow {
                    date: "2025-10-21".into(),
                    description: "Uber".into(),
                    category: "Transport".into(),
                    amount: 23.0,
                },
            ],
        )
        .await;
    let dispatcher = ToolDispatcher::new(ledger);

    let output = dispatcher
        .execute(
            "get_expense_history",
            &json!({
                "workbook_id": "wb-1",
                "worksheet_name": "Despesas",
                "filters": {"category": "Food"},
            }),
        )
        .await
        .unwrap();
    let result: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(result["count"], 2);
    for expense in result["expenses"].as_array().unwrap() {
        assert_eq!(expense["category"], "Food");
    }

    // AND-combined across keys.
    let output = dispatcher
        .execute(
            "get_expense_history",
            &json!({
                "workbook_id": "wb-1",
                "worksheet_name": "Despesas",
                "filters": {"category": "Food", "date": "2025-10-21"},
            }),
        )
        .await
        .unwrap();
    let result: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(result["count"], 1);
    assert_eq!(result["expenses"][0]["description"], "Almoço");
}

#[tokio::test]
async fn absent_filter_returns_all_rows() {
    let ledger = Arc::new(MemoryLedger::new());
    ledger
        .seed(
            "wb-1",
            "Despesas",
            vec![
                ExpenseRow {
                    date: "2025-10-20".into(),
                    description: "Mercado".into(),
                    category: "Food".into(),
                    amount: 87.3,
                },
                ExpenseRow {
                    date: "2025-10-21".into(),
                    description: "Uber".into(),
                    category: "Transport".into(),
                    amount: 23.0,
                },
            ],
        )
        .await;
    let dispatcher = ToolDispatcher::new(ledger);

    let output = dispatcher
        .execute(
            "get_expense_history",
            &json!({"workbook_id": "wb-1", "worksheet_name": "Despesas"}),
        )
        .await
        .unwrap();
    let result: Value = serde_json::from_str(&output).unwrap();

    assert_eq!(result["count"], 2);
}

struct SlowLedger {
    delay: Duration,
}

#[async_trait]
impl Ledger for SlowLedger {
    async fn append_expense(
        &self,
        _workbook_id: &str,
        _worksheet_name: &str,
        _row: &ExpenseRow,
    ) -> Result<(), LedgerError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn read_history(
        &self,
        _workbook_id: &str,
        _worksheet_name: &str,
    ) -> Result<Vec<ExpenseRow>, LedgerError> {
        Ok(Vec::new())
    }
}

struct FailingLedger;

#[async_trait]
impl Ledger for FailingLedger {
    async fn append_expense(
        &self,
        _workbook_id: &str,
        _worksheet_name: &str,
        _row: &ExpenseRow,
    ) -> Result<(), LedgerError> {
        Err(LedgerError::Service("workbook locked by another user".to_string()))
    }

    async fn read_history(
        &self,
        _workbook_id: &str,
        _worksheet_name: &str,
    ) -> Result<Vec<ExpenseRow>, LedgerError> {
        Err(LedgerError::Service("token refresh failed".to_string()))
    }
}

#[tokio::test]
async fn slow_handler_hits_the_deadline_and_dispatcher_stays_usable() {
    let slow = Arc::new(SlowLedger {
        delay: Duration::from_secs(10),
    });
    let dispatcher = ToolDispatcher::new(slow).with_timeout(Duration::from_millis(50));

    let error = dispatcher.execute("add_expense", &lunch_args()).await.unwrap_err();
    assert!(matches!(error, ToolError::Timeout { tool: "add_expense", .. }));

    // The aborted call must not poison the dispatcher for later calls.
    let output = dispatcher
        .execute(
            "get_expense_history",
            &json!({"workbook_id": "wb-1", "worksheet_name": "Despesas"}),
        )
        .await
        .unwrap();
    assert!(output.contains("\"success\":true"));
}

#[tokio::test]
async fn ledger_faults_are_translated_to_tool_errors() {
    let dispatcher = ToolDispatcher::new(Arc::new(FailingLedger));

    let error = dispatcher.execute("add_expense", &lunch_args()).await.unwrap_err();
    match error {
        ToolError::Ledger(ledger_error) => {
            assert!(ledger_error.to_string().contains("workbook locked"));
        }
        other => panic!("expected Ledger error, got {:?}", other),
    }
}
