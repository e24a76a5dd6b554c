use mcm_export::output::{map_cmd_result_to_json, CliResponse};
use mcm_export::Error;
use serde_json::json;

#[test]
fn credential_not_found_serializes_with_hint() {
    let err = Error::credential_not_found("svc-export", "mcm-adminservice");

    let json = CliResponse::<()>::from_error(&err).to_json();

    assert!(json.contains("\"success\": false"));
    assert!(json.contains("\"code\": \"credential.not_found\""));
    assert!(json.contains("\"account\": \"svc-export\""));
    assert!(json.contains("mcm-export keychain set --account svc-export"));
}

#[test]
fn credential_errors_map_to_exit_code_4() {
    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(
        Error::credential_not_found("svc-export", "mcm-adminservice"),
    ));
    assert_eq!(exit_code, 4);

    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(
        Error::credential_store_failed("platform secure storage unavailable"),
    ));
    assert_eq!(exit_code, 4);
}

#[test]
fn auth_failure_maps_to_exit_code_10() {
    let err = Error::api_auth_failed("https://mcm.example.com/AdminService", 401);

    let json = CliResponse::<()>::from_error(&err).to_json();
    assert!(json.contains("\"code\": \"api.auth_failed\""));
    assert!(json.contains("\"status\": 401"));

    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));
    assert_eq!(exit_code, 10);
}

#[test]
fn transient_error_is_retryable_and_maps_to_exit_code_20() {
    let err = Error::api_transient("https://mcm.example.com/AdminService", 3, "timed out");

    let json = CliResponse::<()>::from_error(&err).to_json();
    assert!(json.contains("\"retryable\": true"));
    assert!(json.contains("\"attempts\": 3"));

    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));
    assert_eq!(exit_code, 20);
}

#[test]
fn write_failure_maps_to_exit_code_20() {
    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(
        Error::export_write_failed("/backup/bundle/1.json", "permission denied"),
    ));
    assert_eq!(exit_code, 20);
}

#[test]
fn validation_errors_map_to_exit_code_2() {
    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(
        Error::validation_missing_argument(vec!["--server".to_string()]),
    ));
    assert_eq!(exit_code, 2);
}

#[test]
fn internal_errors_map_to_exit_code_1() {
    let (_value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(
        Error::internal_unexpected("state desync"),
    ));
    assert_eq!(exit_code, 1);
}

#[test]
fn success_envelope_wraps_data_and_keeps_exit_code() {
    let (value, exit_code) = map_cmd_result_to_json(Ok((json!({ "recordsFetched": 30 }), 0)));

    assert_eq!(exit_code, 0);
    assert_eq!(value.unwrap()["recordsFetched"], 30);

    let json = CliResponse::success(json!({ "ok": true })).to_json();
    assert!(json.contains("\"success\": true"));
    assert!(json.contains("\"ok\": true"));
}
