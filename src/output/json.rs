//! JSON output renderer.
//!
//! Prints the response body as pretty JSON, unchanged.

use serde_json::Value;

use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_round_trips_profile() {
        let profile = serde_json::json!({
            "id": 7,
            "username": "o.shevchenko@example.com",
            "first_name": "Олена",
        });
        let output = JsonRenderer.render(&profile);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn render_null() {
        assert_eq!(JsonRenderer.render(&Value::Null), "null");
    }
}
