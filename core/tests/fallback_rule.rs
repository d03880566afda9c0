//! Fallback rule tests: behaviour when no similar reference row exists.

use staffing_core::{
    config::{SimilarityConfig, StaffingRule},
    estimator::{EstimateBasis, Estimator},
    query::StaffingQuery,
    reference::ReferenceTable,
};
use std::sync::Arc;

fn empty_estimator() -> Estimator {
    let table = ReferenceTable::from_rows("empty", Vec::new());
    Estimator::new(Arc::new(table), StaffingRule::default(), SimilarityConfig::default())
}

#[test]
fn weekend_night_event_stacks_every_bonus() {
    let prediction = empty_estimator().estimate(&StaffingQuery::new(40, 6, 22, true));
    // max(2, 40 / 4) + 2 + 1 + 3
    assert_eq!(prediction.staff_needed, 16);
    assert_eq!(prediction.confidence, 0.6);
    assert_eq!(prediction.basis, EstimateBasis::Fallback);
}

#[test]
fn small_patient_load_is_floored_at_two() {
    let prediction = empty_estimator().estimate(&StaffingQuery::new(4, 1, 12, false));
    assert_eq!(prediction.staff_needed, 2, "4 / 4 = 1 must be floored to 2");
    assert_eq!(prediction.confidence, 0.6);
}

#[test]
fn floor_applies_before_bonuses() {
    // Baseline 0 is floored to 2, then the night bonus is added on top.
    let prediction = empty_estimator().estimate(&StaffingQuery::new(0, 0, 0, false));
    assert_eq!(prediction.staff_needed, 3);
}

#[test]
fn baseline_division_truncates() {
    let estimator = empty_estimator();
    assert_eq!(estimator.estimate(&StaffingQuery::new(43, 1, 12, false)).staff_needed, 10);
    assert_eq!(estimator.estimate(&StaffingQuery::new(47, 1, 12, false)).staff_needed, 11);
}

#[test]
fn night_shift_boundaries_are_exclusive() {
    let estimator = empty_estimator();
    let staff_at = |hour| estimator.estimate(&StaffingQuery::new(40, 1, hour, false)).staff_needed;

    assert_eq!(staff_at(7), 11, "07:00 is night shift");
    assert_eq!(staff_at(8), 10, "08:00 is day shift");
    assert_eq!(staff_at(20), 10, "20:00 is day shift");
    assert_eq!(staff_at(21), 11, "21:00 is night shift");
}

#[test]
fn weekend_starts_on_day_five() {
    let estimator = empty_estimator();
    let staff_on = |day| estimator.estimate(&StaffingQuery::new(40, day, 12, false)).staff_needed;

    assert_eq!(staff_on(4), 10);
    assert_eq!(staff_on(5), 12);
    assert_eq!(staff_on(6), 12);
}

#[test]
fn no_upper_cap_on_staff() {
    let prediction = empty_estimator().estimate(&StaffingQuery::new(1000, 6, 23, true));
    assert_eq!(prediction.staff_needed, 250 + 2 + 1 + 3);
}

#[test]
fn generated_and_fallback_forms_differ_on_floor_order() {
    let rule = StaffingRule::default();
    let query = StaffingQuery::new(5, 6, 12, false);

    // Generation: max(2, 1 + 2) = 3. Fallback: max(2, 1) + 2 = 4.
    assert_eq!(rule.generated_staff(&query), 3);
    assert_eq!(rule.fallback_staff(&query), 4);
}

#[test]
fn custom_rule_changes_fallback() {
    let rule = StaffingRule {
        patients_per_staff: 5,
        event_bonus: 10,
        ..StaffingRule::default()
    };
    let table = ReferenceTable::from_rows("empty", Vec::new());
    let estimator = Estimator::new(Arc::new(table), rule, SimilarityConfig::default());

    let prediction = estimator.estimate(&StaffingQuery::new(50, 1, 12, true));
    assert_eq!(prediction.staff_needed, 20);
}
