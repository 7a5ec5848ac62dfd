//! CLI output formatting tests.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use serde_json::json;
    use uptimekit_core::{Monitor, Record, ResourceKind};

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_format_record_lists_fields() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_record(
            ResourceKind::Integration,
            &record(json!({"id": 12, "type": "webhook", "enabled": true, "note": null})),
        );

        assert!(output.starts_with("Integration 12"));
        assert!(output.contains("type     webhook"));
        assert!(output.contains("enabled  true"));
        assert!(output.contains("note     null"));
    }

    #[test]
    fn test_format_record_list_table() {
        let formatter = TextFormatter::new(false);
        let records = vec![
            record(json!({"id": 1, "friendlyName": "web"})),
            record(json!({"id": "1234", "name": "api"})),
            record(json!({"id": 5})),
        ];
        let output = formatter.format_record_list(ResourceKind::Monitor, &records);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "ID    Name");
        assert_eq!(lines[1], "1     web");
        assert_eq!(lines[2], "1234  api");
        assert_eq!(lines[3], "5     -");
        assert_eq!(lines[4], "3 monitor");
    }

    #[test]
    fn test_format_empty_list() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_record_list(ResourceKind::StatusPage, &[]);
        assert_eq!(output, "No status-page resources found");
    }

    #[test]
    fn test_format_monitor() {
        let formatter = TextFormatter::new(false);
        let monitor: Monitor = serde_json::from_value(json!({
            "id": 800,
            "friendlyName": "Homepage",
            "url": "https://example.com",
            "type": "HTTP",
            "interval": 300,
            "status": "PAUSED"
        }))
        .unwrap();

        let output = formatter.format_monitor(&monitor);
        assert!(output.starts_with("Homepage (800)"));
        assert!(output.contains("Status:   PAUSED"));
        assert!(output.contains("Interval: 300s"));
    }

    #[test]
    fn test_monitor_status_colors() {
        let formatter = TextFormatter::new(true);
        for (status, color) in [("UP", "\x1b[32m"), ("DOWN", "\x1b[31m"), ("PAUSED", "\x1b[33m")] {
            let monitor: Monitor = serde_json::from_value(json!({"id": 1, "status": status})).unwrap();
            let output = formatter.format_monitor(&monitor);
            assert!(output.contains(color), "{status}");
        }
    }

    #[test]
    fn test_format_deleted() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_deleted(ResourceKind::Monitor, "7", false),
            "Deleted monitor 7"
        );
        assert_eq!(
            formatter.format_deleted(ResourceKind::Monitor, "7", true),
            "Deleted monitor 7 (confirmed)"
        );
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{DeleteOutput, JsonFormatter};

    #[test]
    fn test_format_pretty_json() {
        let formatter = JsonFormatter::new(true);

        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_format_compact_json() {
        let formatter = JsonFormatter::new(false);

        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();

        assert_eq!(output, r#"{"key":"value"}"#);
    }

    #[test]
    fn test_format_delete_output() {
        let formatter = JsonFormatter::new(false);
        let output = formatter
            .format(&DeleteOutput {
                kind: "monitor".to_string(),
                id: "7".to_string(),
                deleted: true,
                confirmed: false,
            })
            .unwrap();

        assert_eq!(
            output,
            r#"{"kind":"monitor","id":"7","deleted":true,"confirmed":false}"#
        );
    }
}
