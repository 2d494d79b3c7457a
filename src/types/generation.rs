//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Settings controlling a chat completion.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub seed: Option<u64>,
    pub tool_choice: Option<ToolChoice>,
    pub user: Option<String>,
}

/// How the model may use the declared tools.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolChoice {
    Auto,
    None,
    Required,
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_leaves_unset_fields_empty() {
        let settings = GenerationSettings::builder()
            .temperature(0.2)
            .tool_choice(ToolChoice::Auto)
            .build();

        assert_eq!(settings.temperature, Some(0.2));
        assert_eq!(settings.tool_choice, Some(ToolChoice::Auto));
        assert!(settings.max_tokens.is_none());
    }

    #[test]
    fn tool_choice_uses_wire_names() {
        assert_eq!(ToolChoice::Auto.to_string(), "auto");
        assert_eq!("required".parse::<ToolChoice>().unwrap(), ToolChoice::Required);
    }
}
