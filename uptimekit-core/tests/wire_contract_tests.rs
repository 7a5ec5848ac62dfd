//! Integration tests for the wire-facing contract of the core crate.

use serde_json::{Value, json};
use uptimekit_core::{FlexBool, FlexId, REDACTION_MARKER, Record, redact_json, redact_value};

#[test]
fn test_flex_bool_contract() {
    let decoded: Vec<FlexBool> = ["true", r#""true""#, r#""FALSE""#, "null"]
        .iter()
        .map(|json| serde_json::from_str(json).unwrap())
        .collect();

    assert_eq!(
        decoded.iter().map(|b| b.get()).collect::<Vec<_>>(),
        vec![Some(true), Some(true), Some(false), None]
    );
    assert!(serde_json::from_str::<FlexBool>(r#""yes""#).is_err());
}

#[test]
fn test_flex_id_contract() {
    let a: FlexId = serde_json::from_str(r#""1234""#).unwrap();
    let b: FlexId = serde_json::from_str("1234").unwrap();
    assert_eq!(a, b);
    assert_eq!(&*a, "1234");
}

#[test]
fn test_redacted_webhook_config_has_no_secrets() {
    let raw = serde_json::to_vec(&json!({
        "friendlyName": "ops webhook",
        "type": "WEBHOOK",
        "value": "https://hooks.example.com/abc",
        "customValue": {
            "headers": {"Authorization": "Bearer s3cr3t", "X-Trace": "on"},
            "payload": {"apiKey": "k-123", "message": "*monitorFriendlyName* is down"}
        }
    }))
    .unwrap();

    let out = redact_json(&raw, 64 * 1024);
    assert!(!out.contains("s3cr3t"));
    assert!(!out.contains("k-123"));

    let parsed: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["customValue"]["headers"]["X-Trace"], json!("on"));
    assert_eq!(parsed["customValue"]["headers"]["Authorization"], json!(REDACTION_MARKER));
    assert_eq!(parsed["friendlyName"], json!("ops webhook"));
}

#[test]
fn test_redaction_of_mixed_types_never_panics() {
    let value = json!([
        null,
        1,
        -2.5,
        "s",
        [[[{"password": [1, {"token": null}]}]]],
        {"a": {"b": {"c": {"secret": {"d": true}}}}}
    ]);

    for budget in [0, 1, 7, 64, 4096] {
        let out = redact_value(&value, budget);
        assert!(!out.contains("\"d\""), "budget {budget}: {out}");
        if out.len() > budget + 32 {
            panic!("budget {budget} not honoured: {out}");
        }
    }
}

#[test]
fn test_record_round_trip_keeps_fields() {
    let record: Record = serde_json::from_str(r#"{"id": 3, "announcement": "hi"}"#).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value, json!({"id": "3", "announcement": "hi"}));
}
