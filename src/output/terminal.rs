//! Terminal renderer: one `key: value` line per field.

use colored::Colorize;
use serde_json::Value;

use crate::output::OutputRenderer;

/// Terminal output renderer with aligned, colored fields.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, value: &Value) -> String {
        let map = match value {
            Value::Object(map) if !map.is_empty() => map,
            Value::Object(_) => return format!("{}", "(empty)".dimmed()),
            other => return format_value(other),
        };

        let width = map.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        let mut output = String::new();
        for (key, field) in map {
            let padding = " ".repeat(width - key.chars().count());
            output.push_str(&format!(
                "  {}{}  {}\n",
                format!("{key}:").cyan(),
                padding,
                format_value(field)
            ));
        }
        output.truncate(output.trim_end().len());
        output
    }
}

/// Strings print bare, `null` is dimmed, everything else is compact JSON.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".dimmed().to_string(),
        other => other.to_string(),
    }
}
