//! Admin account queries.

use clinicdir_core::{Admin, generate_id};
use clinicdir_storage::{AdminRow, StorageError};
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;
use time::OffsetDateTime;

use crate::error::{is_unique_violation, query_error};

type AdminTuple = (String, String, String, OffsetDateTime, OffsetDateTime);

fn into_admin((id, name, password_hash, created_at, updated_at): AdminTuple) -> Admin {
    AdminRow {
        id,
        name,
        password_hash,
        created_at,
        updated_at,
    }
    .into()
}

pub async fn create(pool: &PgPool, name: &str, password_hash: &str) -> Result<Admin, StorageError> {
    let row: AdminTuple = query_as(
        "INSERT INTO admins (id, name, password_hash) VALUES ($1, $2, $3)
         RETURNING id, name, password_hash, created_at, updated_at",
    )
    .bind(generate_id())
    .bind(name)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::already_exists("admin", name)
        } else {
            query_error("create admin", e)
        }
    })?;
    Ok(into_admin(row))
}

pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Admin>, StorageError> {
    let row: Option<AdminTuple> = query_as(
        "SELECT id, name, password_hash, created_at, updated_at FROM admins WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(|e| query_error("find admin", e))?;
    Ok(row.map(into_admin))
}
