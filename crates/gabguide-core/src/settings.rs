use serde::{Deserialize, Serialize};

/// Supported analysis models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Model {
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    #[serde(rename = "gemini-2.0-flash-lite")]
    Gemini20FlashLite,
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
    #[serde(rename = "gemini-2.5-flash-preview")]
    Gemini25FlashPreview,
    #[serde(rename = "gemini-3-pro-preview")]
    Gemini3ProPreview,
    #[default]
    #[serde(rename = "gemini-3-flash-preview")]
    Gemini3FlashPreview,
}

impl Model {
    pub const ALL: &'static [Model] = &[
        Model::Gemini20Flash,
        Model::Gemini20FlashLite,
        Model::Gemini25Pro,
        Model::Gemini25FlashLite,
        Model::Gemini25FlashPreview,
        Model::Gemini3ProPreview,
        Model::Gemini3FlashPreview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Gemini20FlashLite => "gemini-2.0-flash-lite",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini25FlashPreview => "gemini-2.5-flash-preview",
            Model::Gemini3ProPreview => "gemini-3-pro-preview",
            Model::Gemini3FlashPreview => "gemini-3-flash-preview",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == s)
    }
}

/// When message bubbles are tinted by their analysis scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ColorByScoring {
    Always,
    #[default]
    AfterRead,
    Never,
}

impl ColorByScoring {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorByScoring::Always => "always",
            ColorByScoring::AfterRead => "afterRead",
            ColorByScoring::Never => "never",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "always" => Some(ColorByScoring::Always),
            "afterRead" | "after_read" => Some(ColorByScoring::AfterRead),
            "never" => Some(ColorByScoring::Never),
            _ => None,
        }
    }
}

/// Application settings. Fields absent from stored JSON take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub api_key: String,
    pub model: Model,
    pub color_by_scoring: ColorByScoring,
    pub custom_languages: Vec<String>,
    pub show_conversation_scores: bool,
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
