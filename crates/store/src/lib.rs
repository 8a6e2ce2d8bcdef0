//! `formlane-store` — the store collaborator consumed by the authorization
//! engine.
//!
//! The engine only ever needs read access (`ResourceStore`); the write-side
//! lives on the concrete [`InMemoryStore`] and is used by API glue and tests.

pub mod contract;
pub mod memory;

pub use contract::{ResourceStore, StoreError};
pub use memory::InMemoryStore;
