//! The deterministic staffing rule.
//!
//! Two forms exist and they are NOT interchangeable:
//!   - `generated_staff` applies the minimum floor AFTER the situational
//!     bonuses. Reference rows are labelled with this form.
//!   - `fallback_staff` applies the floor to the baseline BEFORE the
//!     bonuses. The estimator uses this form when no similar rows match.
//!
//! Division is truncating in both forms and no upper cap exists.

use crate::{
    config::StaffingRule,
    query::StaffingQuery,
    types::StaffCount,
};

impl StaffingRule {
    /// Baseline staff for the patient load: `patient_count / patients_per_staff`.
    pub fn baseline(&self, query: &StaffingQuery) -> StaffCount {
        query.patient_count / self.patients_per_staff
    }

    pub fn is_weekend(&self, day_of_week: i64) -> bool {
        day_of_week >= self.weekend_from_day
    }

    pub fn is_night(&self, hour_of_day: i64) -> bool {
        hour_of_day < self.night_before_hour || hour_of_day > self.night_after_hour
    }

    /// Sum of the weekend, night-shift and special-event bonuses that apply.
    pub fn adjustments(&self, query: &StaffingQuery) -> StaffCount {
        let mut bonus = 0;
        if self.is_weekend(query.day_of_week) {
            bonus += self.weekend_bonus;
        }
        if self.is_night(query.hour_of_day) {
            bonus += self.night_bonus;
        }
        if query.has_event {
            bonus += self.event_bonus;
        }
        bonus
    }

    /// Label for a synthetic reference row: floor applied last.
    pub fn generated_staff(&self, query: &StaffingQuery) -> StaffCount {
        (self.baseline(query) + self.adjustments(query)).max(self.min_staff)
    }

    /// Fallback estimate: floor applied to the baseline, bonuses on top.
    pub fn fallback_staff(&self, query: &StaffingQuery) -> StaffCount {
        self.baseline(query).max(self.min_staff) + self.adjustments(query)
    }
}
