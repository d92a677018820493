//! Directory entities: doctors, hospitals and departments.
//!
//! Entities are owned by the store. The types here are the transient copies
//! the server caches and serves, plus the `*Draft` input shapes accepted by
//! the admin mutation routes.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{CoreError, Result};
use crate::id::validate_id;
use crate::rating::Rating;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
}

/// A doctor as stored, with foreign keys only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub rating: Rating,
    pub specialty: String,
    pub hospital_id: String,
    pub department_id: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A doctor with its hospital and department resolved.
///
/// `hospital` is `None` when the referenced hospital no longer exists;
/// `department` is `None` when the doctor has no department or it does not
/// resolve. Fields are spelled out rather than flattened so the record
/// round-trips through MessagePack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: String,
    pub name: String,
    pub rating: Rating,
    pub specialty: String,
    pub hospital_id: String,
    pub department_id: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<Hospital>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
}

impl DoctorRecord {
    pub fn new(
        doctor: Doctor,
        hospital: Option<Hospital>,
        department: Option<Department>,
    ) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name,
            rating: doctor.rating,
            specialty: doctor.specialty,
            hospital_id: doctor.hospital_id,
            department_id: doctor.department_id,
            email: doctor.email,
            phone: doctor.phone,
            notes: doctor.notes,
            created_at: doctor.created_at,
            hospital,
            department,
        }
    }
}

/// Input for creating or replacing a doctor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorDraft {
    pub name: String,
    pub rating: String,
    #[serde(default)]
    pub specialty: String,
    pub hospital_id: String,
    #[serde(default)]
    pub department_id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A draft that passed validation. Strings are trimmed and blank optional
/// fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDoctor {
    pub name: String,
    pub rating: Rating,
    pub specialty: String,
    pub hospital_id: String,
    pub department_id: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl ValidDoctor {
    pub fn into_doctor(self, id: String, created_at: OffsetDateTime) -> Doctor {
        Doctor {
            id,
            name: self.name,
            rating: self.rating,
            specialty: self.specialty,
            hospital_id: self.hospital_id,
            department_id: self.department_id,
            email: self.email,
            phone: self.phone,
            notes: self.notes,
            created_at,
        }
    }
}

impl DoctorDraft {
    pub fn validate(&self) -> Result<ValidDoctor> {
        let name = required("name", &self.name)?;
        let rating = self
            .rating
            .parse::<Rating>()
            .map_err(|_| CoreError::validation("rating", "must be one of A, B, C, D"))?;
        let hospital_id = required("hospital_id", &self.hospital_id)?;
        validate_id(&hospital_id).map_err(|e| CoreError::validation("hospital_id", e.to_string()))?;
        let department_id = optional(self.department_id.as_deref());
        if let Some(id) = &department_id {
            validate_id(id).map_err(|e| CoreError::validation("department_id", e.to_string()))?;
        }
        let email = required("email", &self.email)?;

        Ok(ValidDoctor {
            name,
            rating,
            specialty: self.specialty.trim().to_string(),
            hospital_id,
            department_id,
            email,
            phone: optional(self.phone.as_deref()),
            notes: optional(self.notes.as_deref()),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HospitalDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl HospitalDraft {
    pub fn validate(&self) -> Result<HospitalDraft> {
        Ok(HospitalDraft {
            name: required("name", &self.name)?,
            address: required("address", &self.address)?,
            phone: required("phone", &self.phone)?,
        })
    }

    pub fn into_hospital(self, id: String) -> Hospital {
        Hospital {
            id,
            name: self.name,
            address: self.address,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub name: String,
}

impl DepartmentDraft {
    pub fn validate(&self) -> Result<DepartmentDraft> {
        Ok(DepartmentDraft {
            name: required("name", &self.name)?,
        })
    }

    pub fn into_department(self, id: String) -> Department {
        Department { id, name: self.name }
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::required(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
