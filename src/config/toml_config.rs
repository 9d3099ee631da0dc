use crate::adapters::gemini::{GeminiSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECONDS};
use crate::adapters::storage::DEFAULT_ROSTER_KEY;
use crate::core::draw::{RevealTiming, MAX_REVEAL_WINDOW};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, ToolboxError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "./event-data";
pub const DEFAULT_GROUP_SIZE: usize = 2;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolboxConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub draw: DrawConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
    #[serde(default)]
    pub name_generator: NameGeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_roster_key")]
    pub roster_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            roster_key: default_roster_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawConfig {
    #[serde(default)]
    pub allow_repeat: bool,
    pub frames: Option<u32>,
    pub initial_delay_ms: Option<u64>,
    pub slowdown: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameGeneratorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for NameGeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            model: None,
            api_key: None,
            timeout_seconds: None,
        }
    }
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

fn default_roster_key() -> String {
    DEFAULT_ROSTER_KEY.to_string()
}

fn default_group_size() -> usize {
    DEFAULT_GROUP_SIZE
}

fn default_true() -> bool {
    true
}

impl ToolboxConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolboxError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ToolboxError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ToolboxError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_storage_key("storage.roster_key", &self.storage.roster_key)?;
        validation::validate_positive_number("grouping.group_size", self.grouping.group_size, 1)?;

        if let Some(frames) = self.draw.frames {
            validation::validate_range("draw.frames", frames, 1, 500)?;
        }
        if let Some(delay) = self.draw.initial_delay_ms {
            validation::validate_range("draw.initial_delay_ms", delay, 1, 5_000)?;
        }
        if let Some(slowdown) = self.draw.slowdown {
            validation::validate_range("draw.slowdown", slowdown, 1.0, 2.0)?;
        }
        let window = self.reveal_timing().total_duration();
        if window > MAX_REVEAL_WINDOW {
            return Err(ToolboxError::InvalidConfigValueError {
                field: "draw".to_string(),
                value: format!("{:.1}s", window.as_secs_f64()),
                reason: format!(
                    "reveal window must not exceed {}s",
                    MAX_REVEAL_WINDOW.as_secs()
                ),
            });
        }

        if let Some(endpoint) = &self.name_generator.endpoint {
            validation::validate_url("name_generator.endpoint", endpoint)?;
        }
        if let Some(model) = &self.name_generator.model {
            validation::validate_non_empty_string("name_generator.model", model)?;
        }
        if let Some(timeout) = self.name_generator.timeout_seconds {
            validation::validate_range("name_generator.timeout_seconds", timeout, 1, 120)?;
        }

        Ok(())
    }

    pub fn reveal_timing(&self) -> RevealTiming {
        let default = RevealTiming::default();
        RevealTiming {
            frames: self.draw.frames.unwrap_or(default.frames),
            initial_delay: self
                .draw
                .initial_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.initial_delay),
            slowdown: self.draw.slowdown.unwrap_or(default.slowdown),
        }
    }

    /// Disabled generators get no key, which makes every grouping fall back
    /// to numbered names. An unresolved `${VAR}` counts as no key.
    pub fn gemini_settings(&self) -> GeminiSettings {
        let ng = &self.name_generator;
        let api_key = if ng.enabled {
            ng.api_key
                .clone()
                .filter(|k| !k.trim().is_empty() && !k.starts_with("${"))
                .or_else(|| GeminiSettings::from_env().api_key)
        } else {
            None
        };

        GeminiSettings {
            endpoint: ng
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: ng.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            timeout: Duration::from_secs(ng.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
        }
    }
}

impl ConfigProvider for ToolboxConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn roster_key(&self) -> &str {
        &self.storage.roster_key
    }

    fn allow_repeat(&self) -> bool {
        self.draw.allow_repeat
    }

    fn group_size(&self) -> usize {
        self.grouping.group_size
    }
}

impl Validate for ToolboxConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
