//! The storage trait every directory backend implements.

use async_trait::async_trait;
use clinicdir_core::{
    Admin, Department, DepartmentDraft, Doctor, Hospital, HospitalDraft, ValidDoctor,
};

use crate::error::StorageError;

/// Persistent store for the clinic directory.
///
/// Implementations must be thread-safe (`Send + Sync`). Ids and `created_at`
/// timestamps are assigned by the store. Foreign keys are checked on write:
/// a doctor's `hospital_id` must exist, and a present `department_id` must
/// exist. Hospitals and departments cannot be deleted while a doctor still
/// references them.
///
/// # Example
///
/// ```ignore
/// use clinicdir_storage::{DirectoryStorage, StorageError};
///
/// async fn hospital_name(storage: &dyn DirectoryStorage, id: &str) -> Result<String, StorageError> {
///     storage
///         .get_hospital(id)
///         .await?
///         .map(|h| h.name)
///         .ok_or_else(|| StorageError::not_found("hospital", id))
/// }
/// ```
#[async_trait]
pub trait DirectoryStorage: Send + Sync {
    // ==================== Doctors ====================

    /// Returns every doctor, newest `created_at` first.
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError>;

    /// Reads a doctor by id. Returns `None` if it does not exist.
    async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, StorageError>;

    /// Inserts a doctor, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidReference` if the hospital or department
    /// does not exist.
    async fn create_doctor(&self, doctor: ValidDoctor) -> Result<Doctor, StorageError>;

    /// Replaces a doctor's fields, keeping its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the doctor does not exist and
    /// `StorageError::InvalidReference` for dangling foreign keys.
    async fn update_doctor(&self, id: &str, doctor: ValidDoctor) -> Result<Doctor, StorageError>;

    /// Deletes a doctor. Doctor deletion is never blocked.
    async fn delete_doctor(&self, id: &str) -> Result<(), StorageError>;

    // ==================== Hospitals ====================

    /// Returns every hospital ordered by name ascending.
    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StorageError>;

    /// Bulk fetch restricted to the given ids. Unknown ids are skipped.
    async fn hospitals_by_ids(&self, ids: &[String]) -> Result<Vec<Hospital>, StorageError>;

    async fn get_hospital(&self, id: &str) -> Result<Option<Hospital>, StorageError>;

    async fn create_hospital(&self, hospital: HospitalDraft) -> Result<Hospital, StorageError>;

    async fn update_hospital(
        &self,
        id: &str,
        hospital: HospitalDraft,
    ) -> Result<Hospital, StorageError>;

    /// Deletes a hospital.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Referenced` if doctors still point at it.
    async fn delete_hospital(&self, id: &str) -> Result<(), StorageError>;

    // ==================== Departments ====================

    /// Returns every department ordered by name ascending.
    async fn list_departments(&self) -> Result<Vec<Department>, StorageError>;

    /// Bulk fetch restricted to the given ids. Unknown ids are skipped.
    async fn departments_by_ids(&self, ids: &[String]) -> Result<Vec<Department>, StorageError>;

    async fn get_department(&self, id: &str) -> Result<Option<Department>, StorageError>;

    async fn create_department(
        &self,
        department: DepartmentDraft,
    ) -> Result<Department, StorageError>;

    async fn update_department(
        &self,
        id: &str,
        department: DepartmentDraft,
    ) -> Result<Department, StorageError>;

    /// Deletes a department.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Referenced` if doctors still point at it.
    async fn delete_department(&self, id: &str) -> Result<(), StorageError>;

    // ==================== Admins ====================

    /// Stores a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the name is taken.
    async fn create_admin(&self, name: &str, password_hash: &str) -> Result<Admin, StorageError>;

    async fn find_admin(&self, name: &str) -> Result<Option<Admin>, StorageError>;

    // ==================== Backend info ====================

    /// Short backend name for logs and readiness output.
    fn backend_name(&self) -> &'static str;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
