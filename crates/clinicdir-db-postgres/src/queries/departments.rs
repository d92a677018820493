//! Department queries.

use clinicdir_core::{Department, DepartmentDraft, ReferenceViolation, Referent, generate_id};
use clinicdir_storage::{DepartmentRow, StorageError, convert_rows};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use crate::error::{is_foreign_key_violation, query_error};
use crate::queries::doctors;

fn into_row((id, name): (String, Option<String>)) -> DepartmentRow {
    DepartmentRow { id, name }
}

pub async fn list(pool: &PgPool) -> Result<Vec<Department>, StorageError> {
    let rows: Vec<(String, Option<String>)> =
        query_as("SELECT id, name FROM departments ORDER BY name ASC, id ASC")
            .fetch_all(pool)
            .await
            .map_err(|e| query_error("list departments", e))?;
    convert_rows(rows.into_iter().map(into_row).collect())
}

pub async fn by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<Department>, StorageError> {
    let rows: Vec<(String, Option<String>)> =
        query_as("SELECT id, name FROM departments WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(|e| query_error("fetch departments by id", e))?;
    convert_rows(rows.into_iter().map(into_row).collect())
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Department>, StorageError> {
    let row: Option<(String, Option<String>)> =
        query_as("SELECT id, name FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| query_error("get department", e))?;
    row.map(|t| Department::try_from(into_row(t))).transpose()
}

pub async fn create(pool: &PgPool, draft: DepartmentDraft) -> Result<Department, StorageError> {
    let department = draft.into_department(generate_id());
    query("INSERT INTO departments (id, name) VALUES ($1, $2)")
        .bind(&department.id)
        .bind(&department.name)
        .execute(pool)
        .await
        .map_err(|e| query_error("create department", e))?;
    Ok(department)
}

pub async fn update(
    pool: &PgPool,
    id: &str,
    draft: DepartmentDraft,
) -> Result<Department, StorageError> {
    let department = draft.into_department(id.to_string());
    let result = query("UPDATE departments SET name = $2 WHERE id = $1")
        .bind(&department.id)
        .bind(&department.name)
        .execute(pool)
        .await
        .map_err(|e| query_error("update department", e))?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("department", id));
    }
    Ok(department)
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<(), StorageError> {
    let department = get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("department", id))?;

    match query("DELETE FROM departments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
    {
        Ok(result) if result.rows_affected() == 0 => {
            Err(StorageError::not_found("department", id))
        }
        Ok(_) => Ok(()),
        Err(e) if is_foreign_key_violation(&e) => {
            let count = doctors::count_referencing(pool, "department_id", id).await?;
            Err(ReferenceViolation {
                kind: Referent::Department,
                id: department.id,
                name: department.name,
                count,
            }
            .into())
        }
        Err(e) => Err(query_error("delete department", e)),
    }
}
