//! Fixed demo roster for local development.

use clinicdir_core::{Department, Doctor, Hospital, Rating};
use time::{Duration, OffsetDateTime};

use crate::InMemoryStorage;

const HOSPITALS: &[(&str, &str, &str, &str)] = &[
    ("h-gangnam", "Gangnam Spine Clinic", "12 Teheran-ro, Seoul", "02-555-0101"),
    ("h-haeundae", "Haeundae Family Hospital", "88 Marine-ro, Busan", "051-700-0202"),
    ("h-suwon", "Suwon Joint Center", "3 Ingye-ro, Suwon", "031-210-0303"),
];

const DEPARTMENTS: &[(&str, &str)] = &[
    ("d-ortho", "Orthopedics"),
    ("d-rehab", "Rehabilitation"),
    ("d-neuro", "Neurology"),
];

// (id, name, rating, specialty, hospital, department, email)
const DOCTORS: &[(&str, &str, Rating, &str, &str, Option<&str>, &str)] = &[
    ("doc-1", "Kim Minjun", Rating::A, "Spine surgery", "h-gangnam", Some("d-ortho"), "minjun.kim@example.org"),
    ("doc-2", "Lee Seoyeon", Rating::B, "Sports injuries", "h-gangnam", Some("d-rehab"), "seoyeon.lee@example.org"),
    ("doc-3", "Park Jiho", Rating::C, "Headache clinic", "h-haeundae", Some("d-neuro"), "jiho.park@example.org"),
    ("doc-4", "Choi Yuna", Rating::A, "Knee replacement", "h-suwon", Some("d-ortho"), "yuna.choi@example.org"),
    ("doc-5", "Jung Hyunwoo", Rating::D, "Physical therapy", "h-suwon", None, "hyunwoo.jung@example.org"),
    ("doc-6", "Kang Eunji", Rating::B, "Stroke recovery", "h-haeundae", Some("d-rehab"), "eunji.kang@example.org"),
];

/// Loads the demo roster. Doctors get staggered creation times so the
/// newest-first listing is deterministic.
pub fn seed_demo_data(storage: &InMemoryStorage) {
    for (id, name, address, phone) in HOSPITALS {
        storage.insert_hospital(Hospital {
            id: (*id).into(),
            name: (*name).into(),
            address: (*address).into(),
            phone: (*phone).into(),
        });
    }
    for (id, name) in DEPARTMENTS {
        storage.insert_department(Department {
            id: (*id).into(),
            name: (*name).into(),
        });
    }

    let base = OffsetDateTime::now_utc() - Duration::days(DOCTORS.len() as i64);
    for (offset, (id, name, rating, specialty, hospital, department, email)) in
        DOCTORS.iter().enumerate()
    {
        storage.insert_doctor_unchecked(Doctor {
            id: (*id).into(),
            name: (*name).into(),
            rating: *rating,
            specialty: (*specialty).into(),
            hospital_id: (*hospital).into(),
            department_id: department.map(Into::into),
            email: (*email).into(),
            phone: None,
            notes: None,
            created_at: base + Duration::days(offset as i64),
        });
    }

    tracing::info!(
        hospitals = HOSPITALS.len(),
        departments = DEPARTMENTS.len(),
        doctors = DOCTORS.len(),
        "Seeded in-memory store with demo data"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdir_storage::DirectoryStorage;

    #[tokio::test]
    async fn demo_roster_references_resolve() {
        let storage = InMemoryStorage::new();
        seed_demo_data(&storage);

        let doctors = storage.list_doctors().await.unwrap();
        assert_eq!(doctors.len(), DOCTORS.len());
        assert_eq!(doctors[0].id, "doc-6");

        for doctor in &doctors {
            assert!(storage.get_hospital(&doctor.hospital_id).await.unwrap().is_some());
            if let Some(dept) = &doctor.department_id {
                assert!(storage.get_department(dept).await.unwrap().is_some());
            }
        }
    }
}
