//! Store implementations.
//!
//! The usecase layer depends on the traits in `domain::store`, not on these
//! concrete types (dependency inversion).

pub mod inmemory;

pub use inmemory::{InMemoryMessageStore, InMemoryViewerStore};
