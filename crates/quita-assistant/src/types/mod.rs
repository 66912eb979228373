pub mod message;
pub mod run;

pub use message::{Message, MessageRole};
pub use run::{RunOutcome, RunStatus, ToolInvocation, ToolResult};
