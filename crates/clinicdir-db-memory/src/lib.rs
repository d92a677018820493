//! In-memory directory storage backend for the clinicdir server.
//!
//! This crate provides an implementation of the `DirectoryStorage` trait from
//! `clinicdir-storage`, using papaya lock-free HashMaps for concurrent access.
//! Data lives only as long as the process.
//!
//! # Example
//!
//! ```ignore
//! use clinicdir_db_memory::InMemoryStorage;
//! use clinicdir_storage::DirectoryStorage;
//!
//! let storage = InMemoryStorage::new();
//! let hospitals = storage.list_hospitals().await?;
//! ```

pub mod seed;
pub mod storage;

pub use clinicdir_storage::{DirectoryStorage, StorageError};
pub use seed::seed_demo_data;
pub use storage::InMemoryStorage;

/// Creates a new shared in-memory storage, optionally seeded with demo data.
pub fn create_storage(seed: bool) -> std::sync::Arc<InMemoryStorage> {
    let storage = InMemoryStorage::new();
    if seed {
        seed_demo_data(&storage);
    }
    std::sync::Arc::new(storage)
}
