//! Diff generation for audit logging

use serde_json::Value;

/// Top-level field changes between two JSON snapshots
///
/// Timestamps that change on every write are skipped.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();

    for (key, before_val) in before_obj {
        if key == "updated_at" {
            continue;
        }
        match after_obj.get(key) {
            Some(after_val) if after_val != before_val => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(before_val),
                format_value(after_val)
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }

    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 40 => {
            format!("\"{}...\"", s.chars().take(37).collect::<String>())
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(_) => "{...}".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_changes() {
        let v = json!({"enabled": true});
        assert_eq!(generate_diff(&v, &v), None);
    }

    #[test]
    fn test_updated_at_ignored() {
        let before = json!({"enabled": true, "updated_at": "a"});
        let after = json!({"enabled": false, "updated_at": "b"});
        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("enabled: true -> false")
        );
    }

    #[test]
    fn test_added_and_removed() {
        let before = json!({"color": "#fff"});
        let after = json!({"icon": "cart"});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("color: \"#fff\" -> (removed)"));
        assert!(diff.contains("icon: (added) -> \"cart\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).as_deref(), Some("1 -> 2"));
    }
}
