// src/backend/storage/mod.rs
// Persistent client state on ic-stable-structures memory

pub mod local;
pub mod memory;
pub mod records;

// Re-export key storage structures and functions for easier access
pub use local::{default_local_storage, LocalStorage, SharedStorage, RECORDS_KEY, RECORD_SEQ_KEY, USER_KEY};
pub use memory::Memory;
pub use records::RecordStore;
