//! Referential guard for hospital and department deletion.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::directory::Doctor;

/// An entity that doctors may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Referent {
    Hospital,
    Department,
}

impl Referent {
    pub fn as_str(self) -> &'static str {
        match self {
            Referent::Hospital => "hospital",
            Referent::Department => "department",
        }
    }
}

impl fmt::Display for Referent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Cannot delete {kind} '{name}': {count} doctor(s) still reference it")]
pub struct ReferenceViolation {
    pub kind: Referent,
    pub id: String,
    pub name: String,
    pub count: usize,
}

/// Number of doctors referencing `id` as their hospital or department.
pub fn count_references<'a, I>(doctors: I, referent: Referent, id: &str) -> usize
where
    I: IntoIterator<Item = &'a Doctor>,
{
    doctors
        .into_iter()
        .filter(|doctor| match referent {
            Referent::Hospital => doctor.hospital_id == id,
            Referent::Department => doctor.department_id.as_deref() == Some(id),
        })
        .count()
}

/// Fails with a count-bearing violation when any doctor references the entity.
pub fn ensure_unreferenced<'a, I>(
    doctors: I,
    referent: Referent,
    id: &str,
    name: &str,
) -> Result<(), ReferenceViolation>
where
    I: IntoIterator<Item = &'a Doctor>,
{
    match count_references(doctors, referent, id) {
        0 => Ok(()),
        count => Err(ReferenceViolation {
            kind: referent,
            id: id.to_string(),
            name: name.to_string(),
            count,
        }),
    }
}
