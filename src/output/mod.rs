//! Output renderers for fetched API data: terminal and JSON.

pub mod json;
pub mod terminal;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trait for rendering an API response to an output format.
pub trait OutputRenderer {
    /// Render a response body to a string.
    fn render(&self, value: &Value) -> String;
}

/// Output format options.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render `value` using the renderer for this format.
    pub fn render(&self, value: &Value) -> String {
        match self {
            OutputFormat::Terminal => terminal::TerminalRenderer.render(value),
            OutputFormat::Json => json::JsonRenderer.render(value),
        }
    }
}
