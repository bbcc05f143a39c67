use serde::{Deserialize, Serialize};
use std::env;
use validator::Validate;

use crate::brain::CONFIDENCE_THRESHOLD;
use crate::error::AppError;

/// Environment variable overriding the confidence threshold.
pub const THRESHOLD_ENV: &str = "MATHQUERY_CONFIDENCE_THRESHOLD";

/// Settings of the dispatch stage.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Validate)]
pub struct DispatcherConfig {
    /// Queries scoring below this are sent back for clarification. Value between 0.0 and 1.0.
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence_threshold: f32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
        }
    }
}

impl DispatcherConfig {
    /// Build a validated config from an explicit threshold.
    pub fn with_threshold(confidence_threshold: f32) -> Result<Self, AppError> {
        if !confidence_threshold.is_finite() {
            return Err(AppError::Validation(format!(
                "confidence_threshold must be finite, got {}",
                confidence_threshold
            )));
        }
        let config = Self {
            confidence_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read the config from the environment, falling back to defaults.
    ///
    /// An unset variable keeps the default; a set but unparsable or
    /// out-of-range value is an error.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var(THRESHOLD_ENV) {
            Ok(raw) => {
                let threshold = raw.trim().parse::<f32>().map_err(|e| {
                    AppError::Config(format!("{} must be a number, got {:?}: {}", THRESHOLD_ENV, raw, e))
                })?;
                Self::with_threshold(threshold)
            }
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(AppError::Config(format!("{}: {}", THRESHOLD_ENV, e))),
        }
    }
}
