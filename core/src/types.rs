//! Shared primitive types used across the estimator.

/// Head count of patients present (or expected) in a department.
pub type PatientCount = i64;

/// Number of staff members required.
pub type StaffCount = i64;

/// Stable identifier a reference table is persisted under.
pub type ModelId = String;

/// Unique identifier of one generation of a reference table.
pub type GenerationId = String;
