//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case(Error::ineligible_meal("dinner"), ErrorCode::IneligibleMeal)]
#[case(Error::not_eligible("expired"), ErrorCode::NotEligible)]
#[case(Error::ineligible_voter("no membership"), ErrorCode::IneligibleVoter)]
#[case(Error::already_marked("twice"), ErrorCode::AlreadyMarked)]
#[case(Error::already_voted("twice"), ErrorCode::AlreadyVoted)]
#[case(Error::poll_closed("late"), ErrorCode::PollClosed)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_snake_case_codes_and_camel_case_fields(expected_trace_id: String) {
    let error = Error::already_voted("already voted")
        .with_trace_id(expected_trace_id)
        .with_details(json!({ "pollId": "p1" }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value["code"], "already_voted");
    assert_eq!(value["traceId"], TRACE_ID);
    assert_eq!(value["details"]["pollId"], "p1");
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    let object = value.as_object().expect("object payload");
    assert!(!object.contains_key("traceId"));
    assert!(!object.contains_key("details"));
}
