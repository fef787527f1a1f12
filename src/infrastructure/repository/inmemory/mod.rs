//! In-memory store implementations.
//!
//! HashMap/Vec guarded by a tokio Mutex, standing in for the external
//! durable store. A DBMS-backed implementation would slot in behind the same
//! traits with a row-to-entity mapping layer; planned for when the backend
//! grows past a single process.

mod message;
mod viewer;

pub use message::InMemoryMessageStore;
pub use viewer::InMemoryViewerStore;
