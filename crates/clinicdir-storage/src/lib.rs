//! # clinicdir-storage
//!
//! Storage abstraction layer for the clinicdir server.
//!
//! This crate defines the [`DirectoryStorage`] trait, the error type shared by
//! all backends, and the raw row types backends convert from. It contains no
//! implementations; see `clinicdir-db-memory` and `clinicdir-db-postgres`.

mod error;
pub mod rows;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use rows::{AdminRow, DepartmentRow, DoctorRow, HospitalRow, convert_rows};
pub use traits::DirectoryStorage;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn DirectoryStorage>;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{DirectoryStorage, DynStorage, StorageError, StorageResult};
}
