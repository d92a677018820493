//! Join, filter and sort over in-memory directory collections.
//!
//! Everything here is synchronous and side-effect free: the same inputs
//! always yield the same output sequence.

use std::collections::HashMap;

use clinicdir_core::{Department, DoctorRecord, Hospital, Rating};
use serde::{Deserialize, Serialize};

use crate::filter::{DoctorFilter, JoinPolicy};

/// A doctor joined with its hospital and department, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorView {
    pub id: String,
    pub name: String,
    pub rating: Rating,
    pub rating_label: String,
    pub specialty: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub hospital: Hospital,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
}

/// Joins each doctor to its hospital and department.
///
/// References are resolved against the `hospitals` and `departments`
/// collections, not the objects embedded in the record. Input order is kept.
pub fn join(
    doctors: &[DoctorRecord],
    hospitals: &[Hospital],
    departments: &[Department],
    policy: JoinPolicy,
) -> Vec<DoctorView> {
    let hospitals: HashMap<&str, &Hospital> =
        hospitals.iter().map(|h| (h.id.as_str(), h)).collect();
    let departments: HashMap<&str, &Department> =
        departments.iter().map(|d| (d.id.as_str(), d)).collect();

    doctors
        .iter()
        .filter_map(|doctor| {
            let hospital = hospitals.get(doctor.hospital_id.as_str())?;
            let department = match doctor.department_id.as_deref() {
                None => None,
                Some(id) => match (departments.get(id), policy) {
                    (Some(dept), _) => Some((*dept).clone()),
                    (None, JoinPolicy::Lax) => None,
                    (None, JoinPolicy::Strict) => return None,
                },
            };
            Some(DoctorView {
                id: doctor.id.clone(),
                name: doctor.name.clone(),
                rating: doctor.rating,
                rating_label: doctor.rating.label().to_string(),
                specialty: doctor.specialty.clone(),
                email: doctor.email.clone(),
                phone: doctor.phone.clone(),
                notes: doctor.notes.clone(),
                hospital: (*hospital).clone(),
                department,
            })
        })
        .collect()
}

/// Returns `true` if the view satisfies every active predicate.
pub fn matches(view: &DoctorView, filter: &DoctorFilter) -> bool {
    if !filter.rating.matches(&view.rating) {
        return false;
    }
    if !filter.hospital.matches(&view.hospital.id) {
        return false;
    }
    if !filter
        .department
        .matches_opt(view.department.as_ref().map(|d| &d.id))
    {
        return false;
    }
    match filter.needle() {
        None => true,
        Some(needle) => {
            view.name.to_lowercase().contains(&needle)
                || view.specialty.to_lowercase().contains(&needle)
        }
    }
}

/// Stable ascending sort by rating; ties keep their relative order.
pub fn sort_by_rating(views: &mut [DoctorView]) {
    views.sort_by_key(|view| view.rating);
}

/// Runs the whole pipeline: join, filter, sort.
pub fn search(
    doctors: &[DoctorRecord],
    hospitals: &[Hospital],
    departments: &[Department],
    filter: &DoctorFilter,
    policy: JoinPolicy,
) -> Vec<DoctorView> {
    let joined = join(doctors, hospitals, departments, policy);
    let joined_len = joined.len();
    let mut results: Vec<DoctorView> = joined
        .into_iter()
        .filter(|view| matches(view, filter))
        .collect();
    sort_by_rating(&mut results);

    tracing::debug!(
        doctors = doctors.len(),
        joined = joined_len,
        matched = results.len(),
        "Doctor search completed"
    );
    results
}
