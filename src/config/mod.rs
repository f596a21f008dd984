//! Configuration management for Yuntu
//!
//! Every tunable of the cloud (canvas, layout, scale range, word caps and the
//! extraction backend) lives in one TOML file. Values are read from the file,
//! then overridden from `YUNTU_SECTION__KEY` environment variables, then
//! validated as a whole.

use crate::error::{Result, YuntuError};
use crate::extraction::semantic::DEFAULT_MAX_INPUT_CHARS;
use crate::extraction::ExtractionMode;
use crate::layout::{CanvasSize, LayoutConfig, ScaleKind, SpiralKind};
use crate::weighting::DEFAULT_WORD_CAP;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod validator;

pub use validator::ConfigValidator;

/// Supported schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

const ENV_PREFIX: &str = "YUNTU_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    #[serde(default = "default_canvas")]
    pub canvas: CanvasSize,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub scale: ScaleConfig,
    #[serde(default)]
    pub weighting: WeightingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub semantic: SemanticConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn default_canvas() -> CanvasSize {
    CanvasSize::new(800.0, 500.0)
}

/// Font size range in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub min_font_px: f64,
    pub max_font_px: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_font_px: 14.0,
            max_font_px: 80.0,
        }
    }
}

/// Merge settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightingConfig {
    /// Words kept after merging extraction output with inclusions
    pub max_words: usize,
}

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_WORD_CAP,
        }
    }
}

/// Extraction backend selection and local-mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub mode: ExtractionMode,
    pub max_words: usize,
    pub exclude_stop_words: bool,
    pub extra_stop_words: Vec<String>,
    pub han_bigrams: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Local,
            max_words: crate::extraction::local::DEFAULT_LOCAL_MAX_WORDS,
            exclude_stop_words: true,
            extra_stop_words: Vec::new(),
            han_bigrams: true,
        }
    }
}

/// Semantic backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Program and arguments; receives the prompt on stdin
    pub command: Vec<String>,
    pub api_key_env: String,
    pub model: String,
    pub max_input_chars: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spiral: Option<SpiralKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_range: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_mode: Option<ExtractionMode>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(YuntuError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| YuntuError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| YuntuError::Io {
                source: e,
                context: format!("Failed to create config directory: {:?}", parent),
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| YuntuError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    ///
    /// The profile is validated together with the rest of the file, so a
    /// profile that breaks an invariant (negative padding, say) fails here.
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| YuntuError::Config(format!("Unknown profile '{}'", profile)))?;

        if let Some(spiral) = overrides.spiral {
            self.layout.spiral = spiral;
        }
        if let Some(scale) = overrides.scale {
            self.layout.scale = scale;
        }
        if let Some(steps) = overrides.rotation_steps {
            self.layout.rotation_steps = steps;
        }
        if let Some(range) = overrides.rotation_range {
            self.layout.rotation_range = range;
        }
        if let Some(padding) = overrides.padding {
            self.layout.padding = padding;
        }
        if let Some(mode) = overrides.extraction_mode {
            self.extraction.mode = mode;
        }

        tracing::debug!("Applied profile '{}'", profile);
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: YUNTU_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    /// Apply `YUNTU_`-prefixed key/value pairs; other keys are ignored
    pub fn apply_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                if let Err(e) = self.set_value_from_env(config_key, value.as_ref()) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "LAYOUT__SPIRAL" => self.layout.spiral = parse_value(path, value)?,
            "LAYOUT__SCALE" => self.layout.scale = parse_value(path, value)?,
            "LAYOUT__FONT_FAMILY" => self.layout.font_family = value.to_string(),
            "LAYOUT__PADDING" => self.layout.padding = parse_value(path, value)?,
            "LAYOUT__ROTATION_STEPS" => self.layout.rotation_steps = parse_value(path, value)?,
            "CANVAS__WIDTH" => self.canvas.width = parse_value(path, value)?,
            "CANVAS__HEIGHT" => self.canvas.height = parse_value(path, value)?,
            "EXTRACTION__MODE" => self.extraction.mode = parse_value(path, value)?,
            "SEMANTIC__MODEL" => self.semantic.model = value.to_string(),
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| YuntuError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("yuntu").join("config.toml"))
    }

    /// Scale range as `(min_px, max_px)`
    pub fn font_range(&self) -> (f64, f64) {
        (self.scale.min_font_px, self.scale.max_font_px)
    }
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| YuntuError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}': {}", value, e),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            canvas: default_canvas(),
            layout: LayoutConfig::default(),
            scale: ScaleConfig::default(),
            weighting: WeightingConfig::default(),
            extraction: ExtractionConfig::default(),
            semantic: SemanticConfig::default(),
            profiles: HashMap::new(),
        }
    }
}
