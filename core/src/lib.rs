//! Hospital staffing estimator.
//!
//! A similarity lookup over a seeded synthetic reference table, with a
//! deterministic formula fallback when no similar scenario exists.

pub mod config;
pub mod error;
pub mod estimator;
pub mod provider;
pub mod query;
pub mod reference;
pub mod rng;
pub mod rule;
pub mod service;
pub mod store;
pub mod types;

pub use error::{StaffingError, StaffingResult};
pub use estimator::{EstimateBasis, Estimator, Prediction};
pub use query::StaffingQuery;
pub use service::StaffingService;
