//! Durable participant → thread mapping.
//!
//! Each messaging participant owns at most one assistant thread; this crate
//! persists that binding. Absence of a binding is a normal lookup outcome,
//! never an error.

pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryThreadStore;
pub use models::ThreadBinding;
pub use mongo::MongoThreadStore;
pub use store::ThreadStore;
