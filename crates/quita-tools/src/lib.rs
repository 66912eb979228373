//! Tool execution for assistant-requested actions.
//!
//! The assistant can request a closed set of ledger operations; the
//! dispatcher validates arguments, enforces a per-call deadline and turns
//! every outcome into a JSON string. One call's failure never aborts the
//! rest of a batch — the orchestrator collects one result per invocation.

pub mod dispatcher;
pub mod error;
pub mod ledger;

pub use dispatcher::{ToolDispatcher, ToolKind};
pub use error::{Result, ToolError};
pub use ledger::{ExpenseRow, Ledger, LedgerError, MemoryLedger};
