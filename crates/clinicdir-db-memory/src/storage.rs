use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use clinicdir_core::{
    Admin, Department, DepartmentDraft, Doctor, Hospital, HospitalDraft, Referent, ValidDoctor,
    ensure_unreferenced, generate_id, now_utc,
};
use clinicdir_storage::{DirectoryStorage, StorageError};
use papaya::HashMap as PapayaHashMap;
use tokio::sync::Mutex;

/// A stored doctor with its insertion sequence, used to break `created_at` ties.
#[derive(Debug, Clone)]
pub(crate) struct DoctorEntry {
    pub(crate) seq: u64,
    pub(crate) doctor: Doctor,
}

/// In-memory directory storage backend using papaya lock-free HashMaps.
///
/// Reads are lock-free. Writes take a single mutex so that foreign-key checks
/// and deletion guards see a consistent view of all maps.
#[derive(Debug)]
pub struct InMemoryStorage {
    pub(crate) doctors: Arc<PapayaHashMap<String, DoctorEntry>>,
    pub(crate) hospitals: Arc<PapayaHashMap<String, Hospital>>,
    pub(crate) departments: Arc<PapayaHashMap<String, Department>>,
    /// Keyed by admin name, which is unique.
    pub(crate) admins: Arc<PapayaHashMap<String, Admin>>,
    seq: AtomicU64,
    write_lock: Mutex<()>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            doctors: Arc::new(PapayaHashMap::new()),
            hospitals: Arc::new(PapayaHashMap::new()),
            departments: Arc::new(PapayaHashMap::new()),
            admins: Arc::new(PapayaHashMap::new()),
            seq: AtomicU64::new(1),
            write_lock: Mutex::new(()),
        }
    }

    pub(crate) fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn check_references(&self, doctor: &ValidDoctor) -> Result<(), StorageError> {
        if !self.hospitals.pin().contains_key(&doctor.hospital_id) {
            return Err(StorageError::invalid_reference(
                "hospital_id",
                &doctor.hospital_id,
            ));
        }
        if let Some(department_id) = &doctor.department_id
            && !self.departments.pin().contains_key(department_id)
        {
            return Err(StorageError::invalid_reference("department_id", department_id));
        }
        Ok(())
    }

    fn doctor_snapshot(&self) -> Vec<Doctor> {
        self.doctors
            .pin()
            .values()
            .map(|entry| entry.doctor.clone())
            .collect()
    }

    /// Inserts a doctor row directly, bypassing reference checks. Used by
    /// seeding and by tests that need dangling references.
    pub fn insert_doctor_unchecked(&self, doctor: Doctor) {
        let entry = DoctorEntry {
            seq: self.next_seq(),
            doctor,
        };
        self.doctors.pin().insert(entry.doctor.id.clone(), entry);
    }

    pub fn insert_hospital(&self, hospital: Hospital) {
        self.hospitals.pin().insert(hospital.id.clone(), hospital);
    }

    pub fn insert_department(&self, department: Department) {
        self.departments
            .pin()
            .insert(department.id.clone(), department);
    }
}

fn by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| name(a).cmp(name(b)));
}

#[async_trait]
impl DirectoryStorage for InMemoryStorage {
    async fn list_doctors(&self) -> Result<Vec<Doctor>, StorageError> {
        let mut entries: Vec<DoctorEntry> = self.doctors.pin().values().cloned().collect();
        entries.sort_by(|a, b| {
            b.doctor
                .created_at
                .cmp(&a.doctor.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(entries.into_iter().map(|entry| entry.doctor).collect())
    }

    async fn get_doctor(&self, id: &str) -> Result<Option<Doctor>, StorageError> {
        Ok(self.doctors.pin().get(id).map(|entry| entry.doctor.clone()))
    }

    async fn create_doctor(&self, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
        let _guard = self.write_lock.lock().await;
        self.check_references(&doctor)?;
        let doctor = doctor.into_doctor(generate_id(), now_utc());
        self.insert_doctor_unchecked(doctor.clone());
        Ok(doctor)
    }

    async fn update_doctor(&self, id: &str, doctor: ValidDoctor) -> Result<Doctor, StorageError> {
        let _guard = self.write_lock.lock().await;
        let existing = self
            .doctors
            .pin()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("doctor", id))?;
        self.check_references(&doctor)?;
        let updated = doctor.into_doctor(id.to_string(), existing.doctor.created_at);
        self.doctors.pin().insert(
            id.to_string(),
            DoctorEntry {
                seq: existing.seq,
                doctor: updated.clone(),
            },
        );
        Ok(updated)
    }

    async fn delete_doctor(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        match self.doctors.pin().remove(id) {
            Some(_) => Ok(()),
            None => Err(StorageError::not_found("doctor", id)),
        }
    }

    async fn list_hospitals(&self) -> Result<Vec<Hospital>, StorageError> {
        let mut hospitals: Vec<Hospital> = self.hospitals.pin().values().cloned().collect();
        by_name(&mut hospitals, |h| &h.name);
        Ok(hospitals)
    }

    async fn hospitals_by_ids(&self, ids: &[String]) -> Result<Vec<Hospital>, StorageError> {
        let guard = self.hospitals.pin();
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }

    async fn get_hospital(&self, id: &str) -> Result<Option<Hospital>, StorageError> {
        Ok(self.hospitals.pin().get(id).cloned())
    }

    async fn create_hospital(&self, hospital: HospitalDraft) -> Result<Hospital, StorageError> {
        let _guard = self.write_lock.lock().await;
        let hospital = hospital.into_hospital(generate_id());
        self.insert_hospital(hospital.clone());
        Ok(hospital)
    }

    async fn update_hospital(
        &self,
        id: &str,
        hospital: HospitalDraft,
    ) -> Result<Hospital, StorageError> {
        let _guard = self.write_lock.lock().await;
        if !self.hospitals.pin().contains_key(id) {
            return Err(StorageError::not_found("hospital", id));
        }
        let hospital = hospital.into_hospital(id.to_string());
        self.insert_hospital(hospital.clone());
        Ok(hospital)
    }

    async fn delete_hospital(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let hospital = self
            .hospitals
            .pin()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("hospital", id))?;
        ensure_unreferenced(&self.doctor_snapshot(), Referent::Hospital, id, &hospital.name)?;
        self.hospitals.pin().remove(id);
        Ok(())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StorageError> {
        let mut departments: Vec<Department> = self.departments.pin().values().cloned().collect();
        by_name(&mut departments, |d| &d.name);
        Ok(departments)
    }

    async fn departments_by_ids(&self, ids: &[String]) -> Result<Vec<Department>, StorageError> {
        let guard = self.departments.pin();
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }

    async fn get_department(&self, id: &str) -> Result<Option<Department>, StorageError> {
        Ok(self.departments.pin().get(id).cloned())
    }

    async fn create_department(
        &self,
        department: DepartmentDraft,
    ) -> Result<Department, StorageError> {
        let _guard = self.write_lock.lock().await;
        let department = department.into_department(generate_id());
        self.insert_department(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        id: &str,
        department: DepartmentDraft,
    ) -> Result<Department, StorageError> {
        let _guard = self.write_lock.lock().await;
        if !self.departments.pin().contains_key(id) {
            return Err(StorageError::not_found("department", id));
        }
        let department = department.into_department(id.to_string());
        self.insert_department(department.clone());
        Ok(department)
    }

    async fn delete_department(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let department = self
            .departments
            .pin()
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("department", id))?;
        ensure_unreferenced(
            &self.doctor_snapshot(),
            Referent::Department,
            id,
            &department.name,
        )?;
        self.departments.pin().remove(id);
        Ok(())
    }

    async fn create_admin(&self, name: &str, password_hash: &str) -> Result<Admin, StorageError> {
        let _guard = self.write_lock.lock().await;
        let admins = self.admins.pin();
        if admins.contains_key(name) {
            return Err(StorageError::already_exists("admin", name));
        }
        let now = now_utc();
        let admin = Admin {
            id: generate_id(),
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        admins.insert(name.to_string(), admin.clone());
        Ok(admin)
    }

    async fn find_admin(&self, name: &str) -> Result<Option<Admin>, StorageError> {
        Ok(self.admins.pin().get(name).cloned())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
