//! Runtime configuration
//!
//! Defaults are overridden by environment variables; CLI flags override both.

use serde::{Deserialize, Serialize};
use std::env;

/// Default chat model for networked insights
pub const DEFAULT_INSIGHT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible chat completions endpoint
pub const DEFAULT_INSIGHT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Insight generator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// API key for the text-generation service (`OPENAI_API_KEY`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Force the local template even when a key is present
    pub use_mock: bool,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_INSIGHT_MODEL.to_string(),
            base_url: DEFAULT_INSIGHT_URL.to_string(),
            timeout_secs: 20,
            temperature: 0.7,
            max_tokens: 200,
            use_mock: false,
        }
    }
}

impl InsightConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if let Ok(model) = env::var("WELLNESS_INSIGHT_MODEL") {
            config.model = model;
        }
        if let Ok(url) = env::var("WELLNESS_INSIGHT_URL") {
            config.base_url = url;
        }
        if let Some(secs) = env::var("WELLNESS_INSIGHT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }
        if let Ok(flag) = env::var("WELLNESS_INSIGHT_MOCK") {
            config.use_mock = parse_flag(&flag);
        }
        config
    }

    /// Whether the networked generator can be used at all
    pub fn networked_available(&self) -> bool {
        !self.use_mock && self.api_key.is_some()
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "127.0.0.1:5000")
    pub bind_address: String,
    /// Directory holding `index.html` and other static assets
    pub static_dir: String,
    pub insight: InsightConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            static_dir: ".".to_string(),
            insight: InsightConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self {
            insight: InsightConfig::from_env(),
            ..Self::default()
        };
        if let Ok(bind) = env::var("WELLNESS_BIND") {
            config.bind_address = bind;
        }
        if let Ok(dir) = env::var("WELLNESS_STATIC_DIR") {
            config.static_dir = dir;
        }
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_defaults() {
        let config = InsightConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 200);
        assert!(!config.networked_available());
    }

    #[test]
    fn test_networked_availability() {
        let mut config = InsightConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(config.networked_available());

        config.use_mock = true;
        assert!(!config.networked_available());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let config = InsightConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1:5000");
        assert_eq!(config.static_dir, ".");
    }
}
