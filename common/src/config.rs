use serde::{Deserialize, Serialize};

/// Visual style requested for the generated deck. Unknown style strings
/// fall back to `Default` rather than failing; the writer maps each style
/// to a slide layout index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Default,
    Minimal,
    Business,
}

impl Style {
    /// Lenient parse: unrecognized input degrades to `Default`, matching
    /// the writer's layout-selection contract.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Style::Minimal,
            "business" => Style::Business,
            _ => Style::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Default => "default",
            Style::Minimal => "minimal",
            Style::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("DECKGEN_API_KEY") {
            config.api_key = Some(key);
        } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.api_key = Some(key);
        }

        if let Ok(url) = std::env::var("DECKGEN_BASE_URL") {
            config.base_url = url;
        }

        if let Ok(model) = std::env::var("DECKGEN_MODEL") {
            config.model = model;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_style_falls_back_to_default() {
        assert_eq!(Style::parse_lenient("business"), Style::Business);
        assert_eq!(Style::parse_lenient("Minimal"), Style::Minimal);
        assert_eq!(Style::parse_lenient("neon"), Style::Default);
        assert_eq!(Style::parse_lenient(""), Style::Default);
    }
}
