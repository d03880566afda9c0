//! Boundary tests: wire requests are validated before the estimator runs.

use staffing_core::{
    config::EstimatorConfig,
    error::StaffingError,
    query::{EventFlag, PredictionRequest, StaffingQuery, StreamRequest},
    service::StaffingService,
};

fn malformed_field(err: StaffingError) -> String {
    match err {
        StaffingError::MalformedQuery { field, .. } => field,
        other => panic!("expected MalformedQuery, got {other:?}"),
    }
}

#[test]
fn empty_stream_message_takes_defaults() {
    let query = StreamRequest::parse("{}").expect("defaults");
    assert_eq!(query, StaffingQuery::new(20, 1, 12, false));
}

#[test]
fn stream_message_overrides_only_given_fields() {
    let query = StreamRequest::parse(r#"{"patient_count": 40, "has_event": 1}"#).expect("parse");
    assert_eq!(query, StaffingQuery::new(40, 1, 12, true));
}

#[test]
fn event_flag_accepts_integers_and_booleans() {
    assert!(!EventFlag::Int(0).to_bool().expect("0"));
    assert!(EventFlag::Int(1).to_bool().expect("1"));
    assert!(EventFlag::Bool(true).to_bool().expect("true"));

    let query = StreamRequest::parse(r#"{"has_event": true}"#).expect("bool flag");
    assert!(query.has_event);
}

#[test]
fn event_flag_outside_zero_one_is_rejected() {
    let err = StreamRequest::parse(r#"{"has_event": 2}"#).expect_err("flag 2");
    assert_eq!(malformed_field(err), "has_event");
}

#[test]
fn out_of_domain_fields_are_rejected() {
    let cases = [
        (r#"{"day_of_week": 7}"#, "day_of_week"),
        (r#"{"day_of_week": -1}"#, "day_of_week"),
        (r#"{"hour_of_day": 24}"#, "hour_of_day"),
        (r#"{"hour_of_day": -1}"#, "hour_of_day"),
        (r#"{"patient_count": -3}"#, "patient_count"),
    ];
    for (message, field) in cases {
        let err = StreamRequest::parse(message).expect_err(message);
        assert_eq!(malformed_field(err), field, "wrong field reported for {message}");
    }
}

#[test]
fn non_numeric_and_non_json_messages_are_malformed() {
    for message in [r#"{"patient_count": "many"}"#, "not json", "42"] {
        let err = StreamRequest::parse(message).expect_err(message);
        assert_eq!(malformed_field(err), "message");
    }
}

#[test]
fn prediction_request_defaults_department() {
    let request: PredictionRequest = serde_json::from_str(
        r#"{"patient_count": 40, "day_of_week": 6, "hour_of_day": 22, "has_event": 1}"#,
    )
    .expect("deserialize");
    assert_eq!(request.department, "Emergency");
    assert_eq!(request.to_query().expect("valid"), StaffingQuery::new(40, 6, 22, true));
}

#[test]
fn prediction_request_requires_every_numeric_field() {
    let result: Result<PredictionRequest, _> =
        serde_json::from_str(r#"{"patient_count": 40, "day_of_week": 6}"#);
    assert!(result.is_err());
}

#[test]
fn invalid_request_is_rejected_before_the_table_is_built() {
    let service = StaffingService::in_memory(EstimatorConfig::default().with_seed(1)).expect("service");
    let request = PredictionRequest {
        patient_count: 40,
        day_of_week:   9,
        hour_of_day:   12,
        has_event:     EventFlag::Int(0),
        department:    "Cardiology".into(),
    };

    let err = service.predict(&request).expect_err("day 9 is out of domain");
    assert_eq!(malformed_field(err), "day_of_week");
    assert!(service.provider().cached().expect("cached").is_none(), "validation must happen before any lookup");
}

#[test]
fn estimator_itself_does_not_validate() {
    let service = StaffingService::in_memory(EstimatorConfig::default().with_seed(1)).expect("service");
    // No reference row has day 9, so the fallback applies: 10 + weekend 2.
    let prediction = service
        .estimate(&StaffingQuery::new(40, 9, 12, false))
        .expect("raw queries pass through");
    assert_eq!(prediction.staff_needed, 12);
    assert_eq!(prediction.confidence, 0.6);
}

#[test]
fn stream_message_round_trips_through_the_service() {
    let service = StaffingService::in_memory(EstimatorConfig::default().with_seed(3)).expect("service");
    let via_stream = service.handle_stream_message("{}").expect("stream");
    let direct = service
        .estimate(&StaffingQuery::new(20, 1, 12, false))
        .expect("direct");

    assert_eq!(via_stream.staff_needed, direct.staff_needed);
    assert_eq!(via_stream.confidence, direct.confidence);
}
