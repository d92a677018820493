//! Doctor search for the clinic directory.
//!
//! Joins doctors with hospitals and departments, applies the facet filters,
//! sorts by rating and paginates. No I/O happens here; callers pass in the
//! collections they fetched.

pub mod engine;
pub mod error;
pub mod filter;
pub mod paginate;
pub mod state;

pub use engine::{DoctorView, join, matches, search, sort_by_rating};
pub use error::SearchError;
pub use filter::{ALL, DoctorFilter, Facet, JoinPolicy};
pub use paginate::{Page, paginate, total_pages};
pub use state::SearchState;
