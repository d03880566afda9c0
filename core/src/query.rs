//! Estimator inputs and the boundary types that produce them.
//!
//! RULE: The estimator never validates. Range checks happen here, when a
//! wire request is turned into a `StaffingQuery`.

use crate::{
    error::{StaffingError, StaffingResult},
    types::PatientCount,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEPARTMENT: &str = "Emergency";

/// The situational tuple the estimator looks up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffingQuery {
    pub patient_count: PatientCount,
    pub day_of_week:   i64,
    pub hour_of_day:   i64,
    pub has_event:     bool,
}

impl StaffingQuery {
    pub fn new(patient_count: PatientCount, day_of_week: i64, hour_of_day: i64, has_event: bool) -> Self {
        Self { patient_count, day_of_week, hour_of_day, has_event }
    }

    /// Check the documented domains: day 0–6, hour 0–23, patients >= 0.
    pub fn validate(&self) -> StaffingResult<()> {
        if self.patient_count < 0 {
            return Err(StaffingError::malformed(
                "patient_count",
                format!("must be non-negative, got {}", self.patient_count),
            ));
        }
        if !(0..=6).contains(&self.day_of_week) {
            return Err(StaffingError::malformed(
                "day_of_week",
                format!("must be within 0..=6, got {}", self.day_of_week),
            ));
        }
        if !(0..=23).contains(&self.hour_of_day) {
            return Err(StaffingError::malformed(
                "hour_of_day",
                format!("must be within 0..=23, got {}", self.hour_of_day),
            ));
        }
        Ok(())
    }
}

/// Special-event flag as it arrives on the wire: `0`/`1` or `false`/`true`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EventFlag {
    Bool(bool),
    Int(i64),
}

impl Default for EventFlag {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl EventFlag {
    pub fn to_bool(self) -> StaffingResult<bool> {
        match self {
            Self::Bool(b) => Ok(b),
            Self::Int(0)  => Ok(false),
            Self::Int(1)  => Ok(true),
            Self::Int(n)  => Err(StaffingError::malformed(
                "has_event",
                format!("must be 0 or 1, got {n}"),
            )),
        }
    }
}

/// One-shot prediction request. Every numeric field is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    pub patient_count: PatientCount,
    pub day_of_week:   i64,
    pub hour_of_day:   i64,
    pub has_event:     EventFlag,
    #[serde(default = "default_department")]
    pub department:    String,
}

impl PredictionRequest {
    pub fn to_query(&self) -> StaffingResult<StaffingQuery> {
        let query = StaffingQuery::new(
            self.patient_count,
            self.day_of_week,
            self.hour_of_day,
            self.has_event.to_bool()?,
        );
        query.validate()?;
        Ok(query)
    }
}

/// One message on the streaming channel. Omitted fields take defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRequest {
    #[serde(default = "default_patient_count")]
    pub patient_count: PatientCount,
    #[serde(default = "default_day_of_week")]
    pub day_of_week:   i64,
    #[serde(default = "default_hour_of_day")]
    pub hour_of_day:   i64,
    #[serde(default)]
    pub has_event:     EventFlag,
}

impl Default for StreamRequest {
    fn default() -> Self {
        Self {
            patient_count: default_patient_count(),
            day_of_week:   default_day_of_week(),
            hour_of_day:   default_hour_of_day(),
            has_event:     EventFlag::default(),
        }
    }
}

impl StreamRequest {
    /// Decode one JSON message and validate it into a query.
    /// Undecodable input is reported as a malformed query.
    pub fn parse(line: &str) -> StaffingResult<StaffingQuery> {
        let request: StreamRequest = serde_json::from_str(line)
            .map_err(|e| StaffingError::malformed("message", e.to_string()))?;
        request.to_query()
    }

    pub fn to_query(&self) -> StaffingResult<StaffingQuery> {
        let query = StaffingQuery::new(
            self.patient_count,
            self.day_of_week,
            self.hour_of_day,
            self.has_event.to_bool()?,
        );
        query.validate()?;
        Ok(query)
    }
}

fn default_department() -> String    { DEFAULT_DEPARTMENT.to_string() }
fn default_patient_count() -> i64    { 20 }
fn default_day_of_week() -> i64      { 1 }
fn default_hour_of_day() -> i64      { 12 }
