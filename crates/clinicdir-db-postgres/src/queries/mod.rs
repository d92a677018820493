//! SQL query implementations.
//!
//! Rows are read as tuples and passed through the row converters in
//! `clinicdir-storage`.

pub mod admins;
pub mod departments;
pub mod doctors;
pub mod hospitals;
