//! Cache-aside access to the three directory collections.
//!
//! Reads try the collection cache first and fall back to the store, writing
//! the store result back under the collection's TTL. Refreshes skip the cache
//! read and always overwrite.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;

use clinicdir_api::CollectionResponse;
use clinicdir_core::{Department, DoctorRecord, EntityKind, Hospital, epoch_millis, now_utc};
use clinicdir_storage::{DynStorage, StorageError};
use serde::{Serialize, de::DeserializeOwned};

use crate::cache::CollectionCache;

/// A collection plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: Vec<T>,
    pub cached: bool,
    /// Retrieval time, epoch milliseconds.
    pub timestamp: i64,
}

impl<T> Fetched<T> {
    fn new(data: Vec<T>, cached: bool) -> Self {
        Self {
            data,
            cached,
            timestamp: epoch_millis(now_utc()),
        }
    }

    pub fn into_collection(self) -> CollectionResponse<T> {
        CollectionResponse {
            data: self.data,
            cached: self.cached,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Clone)]
pub struct DirectoryAccessor {
    storage: DynStorage,
    cache: CollectionCache,
}

impl DirectoryAccessor {
    pub fn new(storage: DynStorage, cache: CollectionCache) -> Self {
        Self { storage, cache }
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    pub fn cache(&self) -> &CollectionCache {
        &self.cache
    }

    /// Doctors, newest first, with hospital and department attached.
    pub async fn doctors(&self) -> Result<Fetched<DoctorRecord>, StorageError> {
        self.read_through(EntityKind::Doctors, || self.load_doctors())
            .await
    }

    /// Hospitals by name.
    pub async fn hospitals(&self) -> Result<Fetched<Hospital>, StorageError> {
        self.read_through(EntityKind::Hospitals, || self.storage.list_hospitals())
            .await
    }

    /// Departments by name.
    pub async fn departments(&self) -> Result<Fetched<Department>, StorageError> {
        self.read_through(EntityKind::Departments, || self.storage.list_departments())
            .await
    }

    /// Hospitals and departments, fetched concurrently.
    pub async fn reference_collections(
        &self,
    ) -> Result<(Fetched<Hospital>, Fetched<Department>), StorageError> {
        let (hospitals, departments) = tokio::join!(self.hospitals(), self.departments());
        Ok((hospitals?, departments?))
    }

    pub async fn refresh_doctors(&self) -> Result<Vec<DoctorRecord>, StorageError> {
        self.refresh_with(EntityKind::Doctors, || self.load_doctors())
            .await
    }

    pub async fn refresh_hospitals(&self) -> Result<Vec<Hospital>, StorageError> {
        self.refresh_with(EntityKind::Hospitals, || self.storage.list_hospitals())
            .await
    }

    pub async fn refresh_departments(&self) -> Result<Vec<Department>, StorageError> {
        self.refresh_with(EntityKind::Departments, || self.storage.list_departments())
            .await
    }

    /// Re-reads `kind` from the store and overwrites its cache entry.
    pub async fn refresh(&self, kind: EntityKind) -> Result<(), StorageError> {
        match kind {
            EntityKind::Doctors => self.refresh_doctors().await.map(drop),
            EntityKind::Hospitals => self.refresh_hospitals().await.map(drop),
            EntityKind::Departments => self.refresh_departments().await.map(drop),
        }
    }

    async fn read_through<T, F, Fut>(
        &self,
        kind: EntityKind,
        load: F,
    ) -> Result<Fetched<T>, StorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, StorageError>>,
    {
        if let Some(data) = self.cache.get::<T>(kind).await {
            return Ok(Fetched::new(data, true));
        }

        let data = load().await?;
        self.cache.put(kind, &data).await;
        tracing::debug!(entity = %kind, count = data.len(), "Loaded collection from store");
        Ok(Fetched::new(data, false))
    }

    async fn refresh_with<T, F, Fut>(&self, kind: EntityKind, load: F) -> Result<Vec<T>, StorageError>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, StorageError>>,
    {
        let data = load().await?;
        self.cache.put(kind, &data).await;
        tracing::info!(entity = %kind, count = data.len(), "Collection cache refreshed");
        Ok(data)
    }

    /// Loads doctors and resolves their references with one bulk fetch per
    /// referenced table.
    async fn load_doctors(&self) -> Result<Vec<DoctorRecord>, StorageError> {
        let doctors = self.storage.list_doctors().await?;

        let hospital_ids: Vec<String> = doctors
            .iter()
            .map(|d| d.hospital_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let department_ids: Vec<String> = doctors
            .iter()
            .filter_map(|d| d.department_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let hospitals_fut = async {
            if hospital_ids.is_empty() {
                Ok(Vec::new())
            } else {
                self.storage.hospitals_by_ids(&hospital_ids).await
            }
        };
        let departments_fut = async {
            if department_ids.is_empty() {
                Ok(Vec::new())
            } else {
                self.storage.departments_by_ids(&department_ids).await
            }
        };
        let (hospitals, departments) = tokio::join!(hospitals_fut, departments_fut);

        let hospitals: HashMap<String, Hospital> = hospitals?
            .into_iter()
            .map(|h| (h.id.clone(), h))
            .collect();
        let departments: HashMap<String, Department> = departments?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        let records = doctors
            .into_iter()
            .map(|doctor| {
                let hospital = hospitals.get(&doctor.hospital_id).cloned();
                if hospital.is_none() {
                    tracing::warn!(
                        doctor = %doctor.id,
                        hospital = %doctor.hospital_id,
                        "Doctor references a missing hospital"
                    );
                }
                let department = doctor
                    .department_id
                    .as_ref()
                    .and_then(|id| departments.get(id).cloned());
                DoctorRecord::new(doctor, hospital, department)
            })
            .collect();
        Ok(records)
    }
}
