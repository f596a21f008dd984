use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{Result, ValidationError, YuntuError};
use crate::extraction::ExtractionMode;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, reporting every problem at once
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_canvas(config, &mut errors);
        Self::validate_scale(config, &mut errors);
        Self::validate_layout(config, &mut errors);
        Self::validate_word_caps(config, &mut errors);
        Self::validate_semantic(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(YuntuError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_canvas(config: &Config, errors: &mut Vec<ValidationError>) {
        for (path, value) in [
            ("canvas.width", config.canvas.width),
            ("canvas.height", config.canvas.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(ValidationError::new(
                    path,
                    format!("Canvas dimension must be a positive number, got {}", value),
                ));
            }
        }
    }

    fn validate_scale(config: &Config, errors: &mut Vec<ValidationError>) {
        let (min, max) = config.font_range();
        if !min.is_finite() || min <= 0.0 {
            errors.push(ValidationError::new(
                "scale.min_font_px",
                format!("Minimum font size must be positive, got {}", min),
            ));
        }
        if !max.is_finite() {
            errors.push(ValidationError::new(
                "scale.max_font_px",
                format!("Maximum font size must be finite, got {}", max),
            ));
        }
        if min > max {
            errors.push(ValidationError::new(
                "scale.max_font_px",
                format!("Maximum font size {} is below the minimum {}", max, min),
            ));
        }
    }

    fn validate_layout(config: &Config, errors: &mut Vec<ValidationError>) {
        let layout = &config.layout;

        if !layout.padding.is_finite() || layout.padding < 0.0 {
            errors.push(ValidationError::new(
                "layout.padding",
                format!("Padding must be zero or more, got {}", layout.padding),
            ));
        }

        // Bounds are independently settable; only finiteness is required
        let (from, to) = layout.rotation_range;
        if !from.is_finite() || !to.is_finite() {
            errors.push(ValidationError::new(
                "layout.rotation_range",
                format!("Rotation bounds must be finite, got ({}, {})", from, to),
            ));
        }

        if layout.font_family.trim().is_empty() {
            errors.push(ValidationError::new(
                "layout.font_family",
                "Font family cannot be empty",
            ));
        }
    }

    fn validate_word_caps(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.weighting.max_words == 0 {
            errors.push(ValidationError::new(
                "weighting.max_words",
                "Word cap must be greater than 0",
            ));
        }

        if config.extraction.max_words == 0 {
            errors.push(ValidationError::new(
                "extraction.max_words",
                "Extraction cap must be greater than 0",
            ));
        }
    }

    fn validate_semantic(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.extraction.mode != ExtractionMode::Semantic {
            return;
        }
        let semantic = &config.semantic;

        if semantic.command.first().map_or(true, |p| p.trim().is_empty()) {
            errors.push(ValidationError::new(
                "semantic.command",
                "Semantic mode needs a command to run",
            ));
        }

        if semantic.model.trim().is_empty() {
            errors.push(ValidationError::new(
                "semantic.model",
                "Model name cannot be empty",
            ));
        }

        if semantic.max_input_chars == 0 {
            errors.push(ValidationError::new(
                "semantic.max_input_chars",
                "Input limit must be greater than 0",
            ));
        }

        let env_var = &semantic.api_key_env;
        match std::env::var(env_var) {
            Ok(key) if key.is_empty() => errors.push(ValidationError::new(
                "semantic.api_key_env",
                format!("Environment variable {} is empty", env_var),
            )),
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::new(
                "semantic.api_key_env",
                format!("Environment variable {} is not set", env_var),
            )),
        }
    }
}
