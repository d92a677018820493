//! Admin mutations on the roster.
//!
//! Every successful write is followed by a refresh of the affected
//! collection snapshots before the call returns, so the next read sees the
//! new data. Hospital and department writes refresh the doctors snapshot too,
//! since doctor records embed them.

use clinicdir_api::ApiError;
use clinicdir_core::{
    Department, DepartmentDraft, Doctor, DoctorDraft, EntityKind, Hospital, HospitalDraft,
    Referent, ensure_unreferenced,
};
use clinicdir_storage::{DynStorage, StorageError};

use crate::accessor::DirectoryAccessor;

#[derive(Clone)]
pub struct RosterService {
    storage: DynStorage,
    accessor: DirectoryAccessor,
}

impl RosterService {
    pub fn new(accessor: DirectoryAccessor) -> Self {
        Self {
            storage: accessor.storage().clone(),
            accessor,
        }
    }

    // ---- doctors ----

    pub async fn create_doctor(&self, draft: DoctorDraft) -> Result<Doctor, ApiError> {
        let valid = draft.validate()?;
        let doctor = self
            .storage
            .create_doctor(valid)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to create doctor"))?;
        self.refresh(&[EntityKind::Doctors]).await;
        Ok(doctor)
    }

    pub async fn update_doctor(&self, id: &str, draft: DoctorDraft) -> Result<Doctor, ApiError> {
        let valid = draft.validate()?;
        let doctor = self
            .storage
            .update_doctor(id, valid)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to update doctor"))?;
        self.refresh(&[EntityKind::Doctors]).await;
        Ok(doctor)
    }

    /// Doctor deletion is unconditional.
    pub async fn delete_doctor(&self, id: &str) -> Result<(), ApiError> {
        self.storage
            .delete_doctor(id)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to delete doctor"))?;
        self.refresh(&[EntityKind::Doctors]).await;
        Ok(())
    }

    // ---- hospitals ----

    pub async fn create_hospital(&self, draft: HospitalDraft) -> Result<Hospital, ApiError> {
        let draft = draft.validate()?;
        let hospital = self
            .storage
            .create_hospital(draft)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to create hospital"))?;
        self.refresh(&[EntityKind::Hospitals]).await;
        Ok(hospital)
    }

    pub async fn update_hospital(
        &self,
        id: &str,
        draft: HospitalDraft,
    ) -> Result<Hospital, ApiError> {
        let draft = draft.validate()?;
        let hospital = self
            .storage
            .update_hospital(id, draft)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to update hospital"))?;
        self.refresh(&[EntityKind::Hospitals, EntityKind::Doctors])
            .await;
        Ok(hospital)
    }

    /// Deletes a hospital no doctor references.
    ///
    /// References are counted on a fresh read of the doctors table; a
    /// referenced hospital never reaches the store's delete.
    pub async fn delete_hospital(&self, id: &str) -> Result<(), ApiError> {
        let hospital = self
            .storage
            .get_hospital(id)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to delete hospital"))?
            .ok_or_else(|| ApiError::not_found(format!("Hospital not found: {id}")))?;

        self.guard(Referent::Hospital, id, &hospital.name).await?;

        self.storage
            .delete_hospital(id)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to delete hospital"))?;
        self.refresh(&[EntityKind::Hospitals, EntityKind::Doctors])
            .await;
        Ok(())
    }

    // ---- departments ----

    pub async fn create_department(&self, draft: DepartmentDraft) -> Result<Department, ApiError> {
        let draft = draft.validate()?;
        let department = self
            .storage
            .create_department(draft)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to create department"))?;
        self.refresh(&[EntityKind::Departments]).await;
        Ok(department)
    }

    pub async fn update_department(
        &self,
        id: &str,
        draft: DepartmentDraft,
    ) -> Result<Department, ApiError> {
        let draft = draft.validate()?;
        let department = self
            .storage
            .update_department(id, draft)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to update department"))?;
        self.refresh(&[EntityKind::Departments, EntityKind::Doctors])
            .await;
        Ok(department)
    }

    pub async fn delete_department(&self, id: &str) -> Result<(), ApiError> {
        let department = self
            .storage
            .get_department(id)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to delete department"))?
            .ok_or_else(|| ApiError::not_found(format!("Department not found: {id}")))?;

        self.guard(Referent::Department, id, &department.name)
            .await?;

        self.storage
            .delete_department(id)
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to delete department"))?;
        self.refresh(&[EntityKind::Departments, EntityKind::Doctors])
            .await;
        Ok(())
    }

    async fn guard(&self, referent: Referent, id: &str, name: &str) -> Result<(), ApiError> {
        let doctors = self
            .storage
            .list_doctors()
            .await
            .map_err(|e| ApiError::from_storage(e, "Failed to check references"))?;
        ensure_unreferenced(&doctors, referent, id, name).map_err(|violation| {
            tracing::info!(
                kind = referent.as_str(),
                id = %id,
                count = violation.count,
                "Deletion blocked by referencing doctors"
            );
            ApiError::from(violation)
        })
    }

    /// Refreshes each collection in turn. The write already happened, so a
    /// failed refresh drops the snapshot instead of failing the request.
    async fn refresh(&self, kinds: &[EntityKind]) {
        for &kind in kinds {
            if let Err(e) = self.accessor.refresh(kind).await {
                log_refresh_failure(kind, &e);
                self.accessor.cache().invalidate(kind).await;
            }
        }
    }
}

fn log_refresh_failure(kind: EntityKind, error: &StorageError) {
    tracing::warn!(entity = %kind, error = %error, "Cache refresh after write failed; snapshot dropped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBackend, CollectionCache};
    use crate::config::CacheConfig;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use clinicdir_core::{Admin, ValidDoctor};
    use clinicdir_db_memory::InMemoryStorage;
    use clinicdir_storage::DirectoryStorage;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Delegates to the in-memory store and counts delete calls.
    struct CountingStorage {
        inner: InMemoryStorage,
        hospital_deletes: AtomicUsize,
        department_deletes: AtomicUsize,
    }

    impl CountingStorage {
        fn new() -> Self {
            Self {
                inner: InMemoryStorage::new(),
                hospital_deletes: AtomicUsize::new(0),
                department_deletes: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectoryStorage for CountingStorage {
        async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError> {
            self.inner.list_doctors().await
        }
        async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, StorageError> {
            self.inner.get_doctor(id).await
        }
        async fn create_doctor(&self, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
            self.inner.create_doctor(doctor).await
        }
        async fn update_doctor(
            &self,
            id: &str,
            doctor: ValidDoctor,
        ) -> Result<Doctor, StorageError> {
            self.inner.update_doctor(id, doctor).await
        }
        async fn delete_doctor(&self, id: &str) -> Result<(), StorageError> {
            self.inner.delete_doctor(id).await
        }
        async fn list_hospitals(&self) -> Result<Vec<Hospital>, StorageError> {
            self.inner.list_hospitals().await
        }
        async fn hospitals_by_ids(&self, ids: &[String]) -> Result<Vec<Hospital>, StorageError> {
            self.inner.hospitals_by_ids(ids).await
        }
        async fn get_hospital(&self, id: &str) -> Result<Option<Hospital>, StorageError> {
            self.inner.get_hospital(id).await
        }
        async fn create_hospital(&self, hospital: HospitalDraft) -> Result<Hospital, StorageError> {
            self.inner.create_hospital(hospital).await
        }
        async fn update_hospital(
            &self,
            id: &str,
            hospital: HospitalDraft,
        ) -> Result<Hospital, StorageError> {
            self.inner.update_hospital(id, hospital).await
        }
        async fn delete_hospital(&self, id: &str) -> Result<(), StorageError> {
            self.hospital_deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_hospital(id).await
        }
        async fn list_departments(&self) -> Result<Vec<Department>, StorageError> {
            self.inner.list_departments().await
        }
        async fn departments_by_ids(
            &self,
            ids: &[String],
        ) -> Result<Vec<Department>, StorageError> {
            self.inner.departments_by_ids(ids).await
        }
        async fn get_department(&self, id: &str) -> Result<Option<Department>, StorageError> {
            self.inner.get_department(id).await
        }
        async fn create_department(
            &self,
            department: DepartmentDraft,
        ) -> Result<Department, StorageError> {
            self.inner.create_department(department).await
        }
        async fn update_department(
            &self,
            id: &str,
            department: DepartmentDraft,
        ) -> Result<Department, StorageError> {
            self.inner.update_department(id, department).await
        }
        async fn delete_department(&self, id: &str) -> Result<(), StorageError> {
            self.department_deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_department(id).await
        }
        async fn create_admin(&self, name: &str, password_hash: &str) -> Result<Admin, StorageError> {
            self.inner.create_admin(name, password_hash).await
        }
        async fn find_admin(&self, name: &str) -> Result<Option<Admin>, StorageError> {
            self.inner.find_admin(name).await
        }
        fn backend_name(&self) -> &'static str {
            "counting"
        }
    }

    fn service(storage: Arc<CountingStorage>) -> (RosterService, DirectoryAccessor) {
        let accessor = DirectoryAccessor::new(
            storage,
            CollectionCache::new(CacheBackend::new_local(), CacheConfig::default()),
        );
        (RosterService::new(accessor.clone()), accessor)
    }

    fn hospital_draft(name: &str) -> HospitalDraft {
        HospitalDraft {
            name: name.into(),
            address: "1 Main St".into(),
            phone: "02-000-0000".into(),
        }
    }

    fn doctor_draft(name: &str, hospital_id: &str, department_id: Option<&str>) -> DoctorDraft {
        DoctorDraft {
            name: name.into(),
            rating: "A".into(),
            specialty: "Cardiology".into(),
            hospital_id: hospital_id.into(),
            department_id: department_id.map(Into::into),
            email: "doc@clinic.example".into(),
            ..DoctorDraft::default()
        }
    }

    #[tokio::test]
    async fn referenced_hospital_delete_is_blocked_before_the_store() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, _) = service(storage.clone());

        let hospital = roster.create_hospital(hospital_draft("Seoul Central")).await.unwrap();
        roster
            .create_doctor(doctor_draft("Dr. Kim", &hospital.id, None))
            .await
            .unwrap();
        roster
            .create_doctor(doctor_draft("Dr. Lee", &hospital.id, None))
            .await
            .unwrap();

        let err = roster.delete_hospital(&hospital.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        let blocked = err.to_body().blocked_by.unwrap();
        assert_eq!(blocked.count, 2);
        assert_eq!(blocked.name, "Seoul Central");
        assert!(err.to_body().error.contains("2 doctor(s)"));
        assert_eq!(storage.hospital_deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreferenced_hospital_delete_succeeds() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, accessor) = service(storage.clone());

        let hospital = roster.create_hospital(hospital_draft("Busan General")).await.unwrap();
        roster.delete_hospital(&hospital.id).await.unwrap();

        assert_eq!(storage.hospital_deletes.load(Ordering::SeqCst), 1);
        assert!(accessor.hospitals().await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn referenced_department_delete_is_blocked() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, _) = service(storage.clone());

        let hospital = roster.create_hospital(hospital_draft("Seoul Central")).await.unwrap();
        let department = roster
            .create_department(DepartmentDraft {
                name: "Cardiology".into(),
            })
            .await
            .unwrap();
        roster
            .create_doctor(doctor_draft("Dr. Kim", &hospital.id, Some(&department.id)))
            .await
            .unwrap();

        let err = roster.delete_department(&department.id).await.unwrap_err();
        assert_eq!(err.to_body().blocked_by.unwrap().count, 1);
        assert_eq!(storage.department_deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_hospital_delete_is_not_found() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, _) = service(storage.clone());
        let err = roster.delete_hospital("nope").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(storage.hospital_deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn writes_refresh_the_snapshot() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, accessor) = service(storage);

        let hospital = roster.create_hospital(hospital_draft("Seoul Central")).await.unwrap();
        // Prime the cache, then mutate.
        assert!(accessor.doctors().await.unwrap().data.is_empty());
        let doctor = roster
            .create_doctor(doctor_draft("Dr. Kim", &hospital.id, None))
            .await
            .unwrap();

        let fetched = accessor.doctors().await.unwrap();
        assert!(fetched.cached);
        assert_eq!(fetched.data.len(), 1);
        assert_eq!(fetched.data[0].id, doctor.id);
    }

    #[tokio::test]
    async fn hospital_rename_reaches_doctor_snapshot() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, accessor) = service(storage);

        let hospital = roster.create_hospital(hospital_draft("Old Name")).await.unwrap();
        roster
            .create_doctor(doctor_draft("Dr. Kim", &hospital.id, None))
            .await
            .unwrap();
        roster
            .update_hospital(&hospital.id, hospital_draft("New Name"))
            .await
            .unwrap();

        let fetched = accessor.doctors().await.unwrap();
        assert!(fetched.cached);
        assert_eq!(fetched.data[0].hospital.as_ref().unwrap().name, "New Name");
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_store() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, _) = service(storage);
        let err = roster
            .create_hospital(HospitalDraft {
                name: "".into(),
                address: "x".into(),
                phone: "y".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_hospital_reference_is_bad_request() {
        let storage = Arc::new(CountingStorage::new());
        let (roster, _) = service(storage);
        let err = roster
            .create_doctor(doctor_draft("Dr. Kim", "missing", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
