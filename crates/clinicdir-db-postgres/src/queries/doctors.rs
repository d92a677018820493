//! Doctor queries.

use clinicdir_core::{Doctor, ValidDoctor, generate_id};
use clinicdir_storage::{DoctorRow, StorageError, convert_rows};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use time::OffsetDateTime;

use crate::error::{constraint_name, is_foreign_key_violation, query_error};

type DoctorTuple = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<i32>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<OffsetDateTime>,
);

const COLUMNS: &str = "id, name, rating, specialty, experience_years, hospital_id, \
                       department_id, email, phone, notes, created_at";

fn into_row(t: DoctorTuple) -> DoctorRow {
    DoctorRow {
        id: t.0,
        name: t.1,
        rating: t.2,
        specialty: t.3,
        experience_years: t.4,
        hospital_id: t.5,
        department_id: t.6,
        email: t.7,
        phone: t.8,
        notes: t.9,
        created_at: t.10,
    }
}

/// Maps a foreign key failure on insert/update to the offending column.
fn write_error(operation: &str, doctor: &ValidDoctor, err: sqlx_core::error::Error) -> StorageError {
    if is_foreign_key_violation(&err) {
        return match constraint_name(&err) {
            Some(c) if c.contains("department") => StorageError::invalid_reference(
                "department_id",
                doctor.department_id.clone().unwrap_or_default(),
            ),
            _ => StorageError::invalid_reference("hospital_id", &doctor.hospital_id),
        };
    }
    query_error(operation, err)
}

pub async fn list(pool: &PgPool) -> Result<Vec<Doctor>, StorageError> {
    let sql = format!("SELECT {COLUMNS} FROM doctors ORDER BY created_at DESC, id DESC");
    let rows: Vec<DoctorTuple> = query_as(&sql)
        .fetch_all(pool)
        .await
        .map_err(|e| query_error("list doctors", e))?;
    convert_rows(rows.into_iter().map(into_row).collect())
}

pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Doctor>, StorageError> {
    let sql = format!("SELECT {COLUMNS} FROM doctors WHERE id = $1");
    let row: Option<DoctorTuple> = query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| query_error("get doctor", e))?;
    row.map(|t| Doctor::try_from(into_row(t))).transpose()
}

pub async fn create(pool: &PgPool, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
    let sql = format!(
        "INSERT INTO doctors (id, name, rating, specialty, hospital_id, department_id, email, phone, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {COLUMNS}"
    );
    let row: DoctorTuple = query_as(&sql)
        .bind(generate_id())
        .bind(&doctor.name)
        .bind(doctor.rating.code())
        .bind(&doctor.specialty)
        .bind(&doctor.hospital_id)
        .bind(&doctor.department_id)
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(&doctor.notes)
        .fetch_one(pool)
        .await
        .map_err(|e| write_error("create doctor", &doctor, e))?;
    Doctor::try_from(into_row(row))
}

pub async fn update(pool: &PgPool, id: &str, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
    let sql = format!(
        "UPDATE doctors
         SET name = $2, rating = $3, specialty = $4, experience_years = NULL,
             hospital_id = $5, department_id = $6, email = $7, phone = $8, notes = $9
         WHERE id = $1
         RETURNING {COLUMNS}"
    );
    let row: Option<DoctorTuple> = query_as(&sql)
        .bind(id)
        .bind(&doctor.name)
        .bind(doctor.rating.code())
        .bind(&doctor.specialty)
        .bind(&doctor.hospital_id)
        .bind(&doctor.department_id)
        .bind(&doctor.email)
        .bind(&doctor.phone)
        .bind(&doctor.notes)
        .fetch_optional(pool)
        .await
        .map_err(|e| write_error("update doctor", &doctor, e))?;
    match row {
        Some(t) => Doctor::try_from(into_row(t)),
        None => Err(StorageError::not_found("doctor", id)),
    }
}

pub async fn delete(pool: &PgPool, id: &str) -> Result<(), StorageError> {
    let result = query("DELETE FROM doctors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| query_error("delete doctor", e))?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("doctor", id));
    }
    Ok(())
}

/// Counts doctors referencing a hospital or department via `column`.
pub async fn count_referencing(
    pool: &PgPool,
    column: &'static str,
    id: &str,
) -> Result<usize, StorageError> {
    let sql = format!("SELECT COUNT(*) FROM doctors WHERE {column} = $1");
    let count: i64 = query_scalar(&sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| query_error("count referencing doctors", e))?;
    Ok(usize::try_from(count).unwrap_or_default())
}
