//! Hospital queries.

use clinicdir_core::{Hospital, HospitalDraft, ReferenceViolation, Referent, generate_id};
use clinicdir_storage::{HospitalRow, StorageError, convert_rows};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use crate::error::{is_foreign_key_violation, query_error};
use crate::queries::doctors;

type HospitalTuple = (String, Option<String>, Option<String>, Option<String>);

fn into_row((id, name, address, phone): HospitalTuple) -> HospitalRow {
    HospitalRow {
        id,
        name,
        address,
        phone,
    }
}

pub async fn list(pool: &PgPool) -> Result<Vec<Hospital>, StorageError> {
    let rows: Vec<HospitalTuple> =
        query_as("SELECT id, name, address, phone FROM hospitals ORDER BY name ASC, id ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| query_error("list hospitals", e))?;
    convert_rows(rows.into_iter().map(into_row).collect())
}

pub async fn by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<Hospital>, StorageError> {
    let rows: Vec<HospitalTuple> =
        query_as("SELECT id, name, address, phone FROM hospitals WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(|e| query_error("fetch hospitals by id", e))?;
    convert_rows(rows.into_iter().map(into_row).collect())
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Hospital>, StorageError> {
    let row: Option<HospitalTuple> =
        query_as("SELECT id, name, address, phone FROM hospitals WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| query_error("get hospital", e))?;
    row.map(|t| Hospital::try_from(into_row(t))).transpose()
}

pub async fn create(pool: &PgPool, draft: HospitalDraft) -> Result<Hospital, StorageError> {
    let hospital = draft.into_hospital(generate_id());
    query("INSERT INTO hospitals (id, name, address, phone) VALUES ($1, $2, $3, $4)")
        .bind(&hospital.id)
        .bind(&hospital.name)
        .bind(&hospital.address)
        .bind(&hospital.phone)
        .execute(pool)
        .await
        .map_err(|e| query_error("create hospital", e))?;
    Ok(hospital)
}

pub async fn update(pool: &PgPool, id: &str, draft: HospitalDraft) -> Result<Hospital, StorageError> {
    let hospital = draft.into_hospital(id.to_string());
    let result = query("UPDATE hospitals SET name = $2, address = $3, phone = $4 WHERE id = $1")
        .bind(&hospital.id)
        .bind(&hospital.name)
        .bind(&hospital.address)
        .bind(&hospital.phone)
        .execute(pool)
        .await
        .map_err(|e| query_error("update hospital", e))?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("hospital", id));
    }
    Ok(hospital)
}

/// Deletes a hospital. `ON DELETE RESTRICT` failures come back as
/// `StorageError::Referenced` with the current reference count.
pub async fn delete(pool: &PgPool, id: &str) -> Result<(), StorageError> {
    let hospital = get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("hospital", id))?;

    match query("DELETE FROM hospitals WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
    {
        Ok(result) if result.rows_affected() == 0 => Err(StorageError::not_found("hospital", id)),
        Ok(_) => Ok(()),
        Err(e) if is_foreign_key_violation(&e) => {
            let count = doctors::count_referencing(pool, "hospital_id", id).await?;
            Err(ReferenceViolation {
                kind: Referent::Hospital,
                id: hospital.id,
                name: hospital.name,
                count,
            }
            .into())
        }
        Err(e) => Err(query_error("delete hospital", e)),
    }
}
