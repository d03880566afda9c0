//! The staffing estimator: similarity lookup with a formula fallback.
//!
//! ALGORITHM:
//!   1. Keep reference rows within ±patient_tolerance patients, on the
//!      same day, within ±hour_tolerance hours and with the same event flag.
//!   2. Matches found: staff = truncated mean of matched staff (never
//!      below min_staff),
//!      confidence = min(max_confidence, base + matches / divisor).
//!   3. No matches: staff = fallback rule, confidence = fallback_confidence.
//!
//! The hour window does NOT wrap around midnight: 23 and 0 are four
//! hours apart, not one.

use crate::{
    config::{SimilarityConfig, StaffingRule},
    query::StaffingQuery,
    reference::{ReferenceRow, ReferenceTable},
    types::StaffCount,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a prediction came from. Not part of the wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EstimateBasis {
    Similar { matches: usize },
    #[default]
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub staff_needed: StaffCount,
    pub confidence:   f64,
    pub timestamp:    DateTime<Utc>,
    #[serde(skip)]
    pub basis:        EstimateBasis,
}

pub struct Estimator {
    table:      Arc<ReferenceTable>,
    rule:       StaffingRule,
    similarity: SimilarityConfig,
}

impl Estimator {
    pub fn new(table: Arc<ReferenceTable>, rule: StaffingRule, similarity: SimilarityConfig) -> Self {
        Self { table, rule, similarity }
    }

    pub fn estimate(&self, query: &StaffingQuery) -> Prediction {
        self.estimate_at(query, Utc::now())
    }

    /// Estimate with an explicit timestamp. Everything except the timestamp
    /// is a pure function of the table and the query.
    pub fn estimate_at(&self, query: &StaffingQuery, timestamp: DateTime<Utc>) -> Prediction {
        let mut matches = 0usize;
        let mut staff_sum: i128 = 0;
        for row in self.similar_rows(query) {
            matches += 1;
            staff_sum += row.staff_needed as i128;
        }

        let prediction = if matches > 0 {
            let mean = staff_sum as f64 / matches as f64;
            Prediction {
                staff_needed: (mean as StaffCount).max(self.rule.min_staff),
                confidence:   self.match_confidence(matches),
                timestamp,
                basis:        EstimateBasis::Similar { matches },
            }
        } else {
            Prediction {
                staff_needed: self.rule.fallback_staff(query),
                confidence:   self.similarity.fallback_confidence,
                timestamp,
                basis:        EstimateBasis::Fallback,
            }
        };

        log::debug!(
            "estimate {:?} -> staff={} confidence={:.2} basis={:?}",
            query,
            prediction.staff_needed,
            prediction.confidence,
            prediction.basis
        );
        prediction
    }

    /// Reference rows inside every tolerance window of `query`.
    pub fn similar_rows<'a>(&'a self, query: &'a StaffingQuery) -> impl Iterator<Item = &'a ReferenceRow> + 'a {
        self.table.rows.iter().filter(move |row| self.is_similar(row, query))
    }

    fn is_similar(&self, row: &ReferenceRow, query: &StaffingQuery) -> bool {
        row.day_of_week == query.day_of_week
            && row.has_event == query.has_event
            && within(row.patient_count, query.patient_count, self.similarity.patient_tolerance)
            && within(row.hour_of_day, query.hour_of_day, self.similarity.hour_tolerance)
    }

    fn match_confidence(&self, matches: usize) -> f64 {
        let raw = self.similarity.base_confidence + matches as f64 / self.similarity.match_divisor;
        raw.min(self.similarity.max_confidence)
    }
}

/// `|a - b| <= tolerance`. A negative tolerance matches nothing.
fn within(a: i64, b: i64, tolerance: i64) -> bool {
    tolerance >= 0 && a.abs_diff(b) <= tolerance as u64
}
