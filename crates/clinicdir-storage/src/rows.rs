//! Raw row shapes and their conversion into domain values.
//!
//! Backends read loosely typed rows (nullable columns, textual ratings) and
//! convert them here, so required-field checks live in one place.

use clinicdir_core::{Admin, Department, Doctor, Hospital, Rating};
use time::OffsetDateTime;

use crate::error::StorageError;

#[derive(Debug, Clone, Default)]
pub struct DoctorRow {
    pub id: String,
    pub name: Option<String>,
    pub rating: Option<String>,
    pub specialty: Option<String>,
    /// Older rosters stored years of experience instead of a specialty.
    pub experience_years: Option<i32>,
    pub hospital_id: Option<String>,
    pub department_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct HospitalRow {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentRow {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: String,
    pub name: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

fn require(kind: &str, id: &str, field: &str, value: Option<String>) -> Result<String, StorageError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| StorageError::invalid_row(format!("{kind} {id}: missing {field}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = StorageError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let name = require("doctor", &id, "name", row.name)?;
        let rating = require("doctor", &id, "rating", row.rating)?
            .parse::<Rating>()
            .map_err(|e| StorageError::invalid_row(format!("doctor {id}: {e}")))?;
        let hospital_id = require("doctor", &id, "hospital_id", row.hospital_id)?;
        let email = require("doctor", &id, "email", row.email)?;
        let created_at = row
            .created_at
            .ok_or_else(|| StorageError::invalid_row(format!("doctor {id}: missing created_at")))?;
        let specialty = non_blank(row.specialty)
            .or_else(|| row.experience_years.map(|years| years.to_string()))
            .unwrap_or_default();

        Ok(Doctor {
            id,
            name,
            rating,
            specialty,
            hospital_id,
            department_id: non_blank(row.department_id),
            email,
            phone: non_blank(row.phone),
            notes: non_blank(row.notes),
            created_at,
        })
    }
}

impl From<&Doctor> for DoctorRow {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: Some(doctor.name.clone()),
            rating: Some(doctor.rating.code().to_string()),
            specialty: Some(doctor.specialty.clone()),
            experience_years: None,
            hospital_id: Some(doctor.hospital_id.clone()),
            department_id: doctor.department_id.clone(),
            email: Some(doctor.email.clone()),
            phone: doctor.phone.clone(),
            notes: doctor.notes.clone(),
            created_at: Some(doctor.created_at),
        }
    }
}

impl TryFrom<HospitalRow> for Hospital {
    type Error = StorageError;

    fn try_from(row: HospitalRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(Hospital {
            name: require("hospital", &id, "name", row.name)?,
            address: require("hospital", &id, "address", row.address)?,
            phone: require("hospital", &id, "phone", row.phone)?,
            id,
        })
    }
}

impl TryFrom<DepartmentRow> for Department {
    type Error = StorageError;

    fn try_from(row: DepartmentRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(Department {
            name: require("department", &id, "name", row.name)?,
            id,
        })
    }
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            id: row.id,
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Converts a batch of rows, failing on the first bad one.
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, StorageError>
where
    T: TryFrom<R, Error = StorageError>,
{
    rows.into_iter().map(T::try_from).collect()
}
