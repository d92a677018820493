//! PostgreSQL implementation of `DirectoryStorage`.

use async_trait::async_trait;
use clinicdir_core::{
    Admin, Department, DepartmentDraft, Doctor, Hospital, HospitalDraft, ValidDoctor,
};
use clinicdir_storage::{DirectoryStorage, StorageError};
use sqlx_postgres::PgPool;

use crate::config::PostgresConfig;
use crate::queries::{admins, departments, doctors, hospitals};
use crate::{migrations, pool};

/// PostgreSQL storage backend.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connects to the database and, if configured, runs migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or a migration fails.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStorage` from an existing connection pool.
    ///
    /// Assumes migrations have already been run.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DirectoryStorage for PostgresStorage {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError> {
        doctors::list(&self.pool).await
    }

    async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, StorageError> {
        doctors::get(&self.pool, id).await
    }

    async fn create_doctor(&self, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
        doctors::create(&self.pool, doctor).await
    }

    async fn update_doctor(&self, id: &str, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
        doctors::update(&self.pool, id, doctor).await
    }

    async fn delete_doctor(&self, id: &str) -> Result<(), StorageError> {
        doctors::delete(&self.pool, id).await
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StorageError> {
        hospitals::list(&self.pool).await
    }

    async fn hospitals_by_ids(&self, ids: &[String]) -> Result<Vec<Hospital>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        hospitals::by_ids(&self.pool, ids).await
    }

    async fn get_hospital(&self, id: &str) -> Result<Option<Hospital>, StorageError> {
        hospitals::get(&self.pool, id).await
    }

    async fn create_hospital(&self, hospital: HospitalDraft) -> Result<Hospital, StorageError> {
        hospitals::create(&self.pool, hospital).await
    }

    async fn update_hospital(
        &self,
        id: &str,
        hospital: HospitalDraft,
    ) -> Result<Hospital, StorageError> {
        hospitals::update(&self.pool, id, hospital).await
    }

    async fn delete_hospital(&self, id: &str) -> Result<(), StorageError> {
        hospitals::delete(&self.pool, id).await
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StorageError> {
        departments::list(&self.pool).await
    }

    async fn departments_by_ids(&self, ids: &[String]) -> Result<Vec<Department>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        departments::by_ids(&self.pool, ids).await
    }

    async fn get_department(&self, id: &str) -> Result<Option<Department>, StorageError> {
        departments::get(&self.pool, id).await
    }

    async fn create_department(
        &self,
        department: DepartmentDraft,
    ) -> Result<Department, StorageError> {
        departments::create(&self.pool, department).await
    }

    async fn update_department(
        &self,
        id: &str,
        department: DepartmentDraft,
    ) -> Result<Department, StorageError> {
        departments::update(&self.pool, id, department).await
    }

    async fn delete_department(&self, id: &str) -> Result<(), StorageError> {
        departments::delete(&self.pool, id).await
    }

    async fn create_admin(&self, name: &str, password_hash: &str) -> Result<Admin, StorageError> {
        admins::create(&self.pool, name, password_hash).await
    }

    async fn find_admin(&self, name: &str) -> Result<Option<Admin>, StorageError> {
        admins::find_by_name(&self.pool, name).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StorageError> {
        pool::ping(&self.pool)
            .await
            .map_err(StorageError::from)
    }
}
