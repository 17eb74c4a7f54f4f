use ccr_request::replication::request::{MISSING_PARAMS_ERROR, MISSING_ROLES_ERROR};
use ccr_request::replication::{
  decode_start_replication_payload, encode_start_replication_payload,
};
use ccr_request::{AssumeRoles, CcrError, Settings, StartReplicationRequest};
use serde_json::json;

fn sample_request() -> StartReplicationRequest {
  StartReplicationRequest::with_settings(
    "follower-logs",
    "us-east",
    "logs-2026.10",
    Settings::new()
      .put("index.number_of_replicas", 1)
      .put("index.refresh_interval", "10s"),
  )
  .assume_roles("ccr_leader_role", "ccr_follower_role")
}

#[test]
fn end_to_end_minimal_request() {
  let request = StartReplicationRequest::new("follower1", "leader-alias", "leader-index");
  request.validate().expect("valid");

  assert_eq!(
    request.to_document().expect("document"),
    json!({
      "leader_alias": "leader-alias",
      "leader_index": "leader-index",
      "follower_index": "follower1",
      "wait_for_restore": false,
      "is_autofollow_request": false,
      "settings": {}
    })
  );
}

#[test]
fn rest_body_to_wire_and_back() {
  let body = br#"{
    "leader_alias": "us-east",
    "leader_index": "logs-2026.10",
    "assume_roles": {
      "leader_cluster_role": "ccr_leader_role",
      "follower_cluster_role": "ccr_follower_role"
    },
    "settings": { "index": { "number_of_replicas": 1, "refresh_interval": "10s" } }
  }"#;

  let parsed = StartReplicationRequest::from_json_slice(body, "follower-logs")
    .and_then(StartReplicationRequest::validated)
    .expect("parse and validate");
  assert_eq!(parsed, sample_request());

  let payload = encode_start_replication_payload(&parsed).expect("encode");
  let shipped = decode_start_replication_payload(&payload).expect("decode");
  assert_eq!(shipped, parsed);
  shipped.validate().expect("still valid after transport");
}

#[test]
fn document_roundtrip_keeps_everything_but_flags() {
  let request = sample_request().wait_for_restore(true).autofollow(true);
  let document = request.to_document().expect("document");
  let parsed = StartReplicationRequest::from_document(document, request.follower_index.clone())
    .expect("parse");

  assert_eq!(parsed.leader_alias, request.leader_alias);
  assert_eq!(parsed.leader_index, request.leader_index);
  assert_eq!(parsed.follower_index, request.follower_index);
  assert_eq!(parsed.assume_roles, request.assume_roles);
  assert_eq!(parsed.settings, request.settings);
  assert!(!parsed.wait_for_restore);
  assert!(!parsed.is_autofollow_request);
}

#[test]
fn binary_roundtrip_reencodes_identically() {
  for request in [
    StartReplicationRequest::new("f", "a", "l"),
    sample_request(),
    sample_request().wait_for_restore(true).autofollow(true),
  ] {
    let bytes = request.to_bytes().expect("encode");
    let decoded = StartReplicationRequest::from_bytes(&bytes).expect("decode");
    assert_eq!(decoded.to_bytes().expect("re-encode"), bytes);
  }
}

#[test]
fn single_leader_role_reports_roles_error() {
  let request = StartReplicationRequest::from_document(
    json!({
      "leader_alias": "a",
      "leader_index": "l",
      "assume_roles": { "leader_cluster_role": "r1" }
    }),
    "f",
  )
  .expect("parse");

  let errors = request.validate().expect_err("must fail");
  assert_eq!(errors.errors(), &[MISSING_ROLES_ERROR.to_string()]);
}

#[test]
fn single_role_survives_the_wire_and_still_fails_validation() {
  let mut request = StartReplicationRequest::new("f", "a", "l");
  request.assume_roles = Some(AssumeRoles {
    leader_cluster_role: None,
    follower_cluster_role: Some("r2".to_string()),
  });

  let decoded = StartReplicationRequest::from_bytes(&request.to_bytes().expect("encode"))
    .expect("decode");
  assert_eq!(decoded.assume_roles, request.assume_roles);
  assert!(decoded.validate().expect_err("must fail").contains(MISSING_ROLES_ERROR));
}

#[test]
fn all_problems_are_reported_together() {
  let mut request = StartReplicationRequest::new("Follower", "", "leader#1");
  request.assume_roles = Some(AssumeRoles::default());

  let errors = request.validate().expect_err("must fail");
  assert_eq!(errors.errors()[0], MISSING_PARAMS_ERROR);
  assert!(errors.errors()[1].contains("[leader#1]"));
  assert!(errors.errors()[2].contains("[Follower]"));
  assert_eq!(errors.errors().last().map(String::as_str), Some(MISSING_ROLES_ERROR));
  assert_eq!(errors.len(), 4);

  match request.validated() {
    Err(CcrError::Validation(aggregate)) => assert_eq!(aggregate, errors),
    other => panic!("unexpected result: {other:?}"),
  }
}

#[test]
fn corrupted_frame_is_rejected_before_decoding() {
  let mut payload = encode_start_replication_payload(&sample_request()).expect("encode");
  let last = payload.len() - 1;
  payload[last] ^= 0x01;
  assert!(matches!(
    decode_start_replication_payload(&payload),
    Err(CcrError::CrcMismatch { .. })
  ));
}
