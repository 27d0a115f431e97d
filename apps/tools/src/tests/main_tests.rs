use super::*;
use shared::error::ErrorCode;

#[test]
fn found_user_prints_plain_row() {
    let user = UserRecord::new("u12", "Kirill G.", false);
    let out = get_output(Some(user), &UserId::from("u12"), false).expect("encode");
    assert_eq!(out.ok().as_deref(), Some("u12\tKirill G.\tfalse"));
}

#[test]
fn found_user_prints_wire_json() {
    let user = UserRecord::new("u1", "Ivan Z.", true);
    let text = get_output(Some(user), &UserId::from("u1"), true)
        .expect("encode")
        .ok()
        .expect("found");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["user_name"], "Ivan Z.");
}

#[test]
fn missing_user_in_json_mode_yields_error_body_and_error() {
    let Err(miss) = get_output(None, &UserId::from("u404"), true).expect("encode") else {
        panic!("expected a miss");
    };
    let body: ApiError = serde_json::from_str(miss.body.as_deref().expect("body")).expect("json");
    assert_eq!(body.code, ErrorCode::NotFound);
    assert_eq!(miss.error.code, ErrorCode::NotFound);
    assert!(miss.error.message.contains("u404"));
}

#[test]
fn missing_user_in_plain_mode_has_no_body() {
    let Err(miss) = get_output(None, &UserId::from("u404"), false).expect("encode") else {
        panic!("expected a miss");
    };
    assert!(miss.body.is_none());
}
