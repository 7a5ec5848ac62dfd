//! Serde tests for wire models.
//!
//! These verify that resources decode from the shapes different API versions
//! actually send, including the inconsistent ones.

use serde_json::json;

use crate::{FlexBool, FlexId, ListPage, Monitor, Record, ResourceKind};

// ============================================================================
// Monitor Serde Tests
// ============================================================================

#[test]
fn test_monitor_decodes_numeric_and_string_ids() {
    let numeric: Monitor = serde_json::from_str(r#"{"id": 800123, "friendlyName": "api"}"#).unwrap();
    let string: Monitor = serde_json::from_str(r#"{"id": "800123", "friendlyName": "api"}"#).unwrap();

    assert_eq!(numeric.id, string.id);
    assert_eq!(numeric.friendly_name.as_deref(), Some("api"));
}

#[test]
fn test_monitor_decodes_stringly_booleans() {
    let monitor: Monitor = serde_json::from_str(
        r#"{
            "id": 1,
            "sslExpirationReminder": "true",
            "domainExpirationReminder": false,
            "followRedirections": null
        }"#,
    )
    .unwrap();

    assert_eq!(monitor.ssl_expiration_reminder, FlexBool::TRUE);
    assert_eq!(monitor.domain_expiration_reminder, FlexBool::FALSE);
    assert!(monitor.follow_redirections.is_absent());
}

#[test]
fn test_monitor_missing_flags_are_absent() {
    let monitor: Monitor = serde_json::from_str(r#"{"id": 5}"#).unwrap();
    assert!(monitor.ssl_expiration_reminder.is_absent());
    assert!(monitor.ssl_expiration_reminder.unwrap_or(true));
}

#[test]
fn test_monitor_rejects_bad_boolean_token() {
    let result: Result<Monitor, _> =
        serde_json::from_str(r#"{"id": 1, "sslExpirationReminder": "yes"}"#);
    assert!(result.is_err());
}

#[test]
fn test_monitor_keeps_unknown_fields() {
    let input = json!({
        "id": 9,
        "type": "HTTP",
        "interval": 300,
        "customHttpHeaders": {"X-Probe": "1"},
        "tags": ["prod"]
    });

    let monitor: Monitor = serde_json::from_value(input).unwrap();
    assert_eq!(monitor.monitor_type.as_deref(), Some("HTTP"));
    assert_eq!(monitor.interval, Some(300));
    assert!(monitor.extra.contains_key("customHttpHeaders"));
    assert!(monitor.extra.contains_key("tags"));

    let output = serde_json::to_value(&monitor).unwrap();
    assert_eq!(output["id"], json!("9"));
    assert_eq!(output["tags"], json!(["prod"]));
}

// ============================================================================
// Record Serde Tests
// ============================================================================

#[test]
fn test_record_flattens_fields() {
    let record: Record =
        serde_json::from_str(r#"{"id": 42, "friendlyName": "Status", "isPasswordSet": true}"#).unwrap();

    assert_eq!(record.id, FlexId::from("42"));
    assert_eq!(record.field("friendlyName"), Some(&json!("Status")));
    assert!(!record.fields.contains_key("id"));
}

#[test]
fn test_record_without_id() {
    let record: Record = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
    assert!(record.id.is_empty());
}

// ============================================================================
// List Page Serde Tests
// ============================================================================

#[test]
fn test_list_page_bare_and_wrapped() {
    let bare: ListPage<Record> = serde_json::from_str(r#"[{"id": 1}, {"id": "2"}]"#).unwrap();
    let wrapped: ListPage<Record> =
        serde_json::from_str(r#"{"data": [{"id": 1}, {"id": 2}], "nextLink": null}"#).unwrap();

    assert_eq!(bare.into_items().len(), 2);
    assert_eq!(wrapped.into_items().len(), 2);
}

#[test]
fn test_list_page_find_by_id() {
    let page: ListPage<Monitor> =
        serde_json::from_str(r#"{"data": [{"id": 1}, {"id": 2, "friendlyName": "two"}]}"#).unwrap();

    let found = page.find("2").unwrap();
    assert_eq!(found.friendly_name.as_deref(), Some("two"));
}

#[test]
fn test_list_page_find_missing() {
    let page: ListPage<Record> = serde_json::from_str(r#"[{"id": 1}]"#).unwrap();
    assert!(page.find("99").is_none());
}

// ============================================================================
// ResourceKind Serde Tests
// ============================================================================

#[test]
fn test_resource_kind_serde_kebab_case() {
    let test_cases = vec![
        (r#""monitor""#, ResourceKind::Monitor),
        (r#""status-page""#, ResourceKind::StatusPage),
        (r#""integration""#, ResourceKind::Integration),
        (r#""maintenance-window""#, ResourceKind::MaintenanceWindow),
    ];

    for (json, expected) in test_cases {
        let result: ResourceKind = serde_json::from_str(json).unwrap();
        assert_eq!(result, expected, "Failed for {}", json);
    }
}
