pub mod admin;
pub mod directory;
pub mod error;
pub mod guard;
pub mod id;
pub mod kind;
pub mod rating;
pub mod time;

pub use admin::Admin;
pub use directory::{
    Department, DepartmentDraft, Doctor, DoctorDraft, DoctorRecord, Hospital, HospitalDraft,
    ValidDoctor,
};
pub use error::{CoreError, ErrorCategory, Result};
pub use guard::{ReferenceViolation, Referent, count_references, ensure_unreferenced};
pub use id::{IdError, generate_id, validate_id};
pub use kind::EntityKind;
pub use rating::Rating;
pub use time::{epoch_millis, now_utc};
