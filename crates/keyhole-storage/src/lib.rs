//! Record-store implementations for the keyhole engine.
//!
//! Two backends of the abstract record store: an in-memory DashMap store
//! and a MySQL store. Both treat expiry as the engine's concern; reads
//! return expired records as stored.

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

pub use keyhole_core::{ReadStore, RecordStore, StoreError};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
