use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// One expense line as stored in the spreadsheet ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: f64,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger service error: {0}")]
    Service(String),
}

/// Trait for the spreadsheet-backed expense ledger.
///
/// Only the functional contract lives here; the HTTP/OAuth mechanics of a
/// concrete ledger service belong to the implementation.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append one expense row to a worksheet.
    async fn append_expense(
        &self,
        workbook_id: &str,
        worksheet_name: &str,
        row: &ExpenseRow,
    ) -> Result<(), LedgerError>;

    /// Read all expense rows of a worksheet, in sheet order.
    async fn read_history(
        &self,
        workbook_id: &str,
        worksheet_name: &str,
    ) -> Result<Vec<ExpenseRow>, LedgerError>;
}

/// In-memory ledger for tests and local development.
#[derive(Default)]
pub struct MemoryLedger {
    sheets: RwLock<HashMap<(String, String), Vec<ExpenseRow>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a worksheet with rows.
    pub async fn seed(&self, workbook_id: &str, worksheet_name: &str, rows: Vec<ExpenseRow>) {
        self.sheets
            .write()
            .await
            .insert((workbook_id.to_string(), worksheet_name.to_string()), rows);
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn append_expense(
        &self,
        workbook_id: &str,
        worksheet_name: &str,
        row: &ExpenseRow,
    ) -> Result<(), LedgerError> {
        self.sheets
            .write()
            .await
            .entry((workbook_id.to_string(), worksheet_name.to_string()))
            .or_default()
            .push(row.clone());
        Ok(())
    }

    async fn read_history(
        &self,
        workbook_id: &str,
        worksheet_name: &str,
    ) -> Result<Vec<ExpenseRow>, LedgerError> {
        Ok(self
            .sheets
            .read()
            .await
            .get(&(workbook_id.to_string(), worksheet_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}
