//! Configuration loading with multi-source merging.
//!
//! Priority (highest to lowest):
//!
//! 1. `LEXORA_*` environment variables (e.g. `LEXORA_COMPLETION__API_KEY`)
//! 2. Project root: `./lexora.toml` or `./.lexora.toml`
//! 3. Global: `~/.config/lexora/config.toml`
//! 4. Built-in defaults

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Completion capability settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    /// Per-call timeout in seconds. Agentic sessions can run long.
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            timeout_secs: 600,
        }
    }
}

/// Case-law database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseLawConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CaseLawConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.courtlistener.com".to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

/// Regulation text service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulationConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RegulationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ecfr.gov".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Research loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    /// Hard cap on tool-calling rounds per session.
    pub max_tool_rounds: usize,
    /// Cap on follow-up searches in the deeper-research pass.
    pub max_follow_up_searches: usize,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: 10,
            max_follow_up_searches: 3,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexoraConfig {
    pub completion: CompletionConfig,
    pub case_law: CaseLawConfig,
    pub regulation: RegulationConfig,
    pub research: ResearchSettings,
}

impl LexoraConfig {
    /// Load configuration from all sources with proper priority.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(LexoraConfig::default()));

        if let Some(global) = Self::global_config_path()
            && global.exists()
        {
            figment = figment.merge(Toml::file(&global));
        }

        for filename in &["lexora.toml", ".lexora.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("LEXORA_").split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load only the built-in defaults (for `--no-config`).
    pub fn load_defaults() -> Self {
        Self::default()
    }

    /// Global config file path: `~/.config/lexora/config.toml`.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lexora").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LexoraConfig::load_defaults();
        assert_eq!(config.research.max_tool_rounds, 10);
        assert_eq!(config.completion.timeout_secs, 600);
        assert!(config.case_law.api_token.is_none());
    }

    #[test]
    fn test_global_config_path() {
        let path = LexoraConfig::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("lexora"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = LexoraConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        let parsed: LexoraConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.research.max_tool_rounds, config.research.max_tool_rounds);
    }
}
