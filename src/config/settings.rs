//! Application settings configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::DEFAULT_SUGGESTION_LIMIT;
use crate::autocomplete::DEFAULT_QUIET_PERIOD_MS;
use crate::preview::{FitPolicy, DEFAULT_VIEWPORT_FRACTION};

/// Default board to browse.
pub const DEFAULT_BASE_URL: &str = "https://yande.re";

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The board's base URL.
    pub base_url: String,
    /// Posts requested per page.
    pub page_limit: u32,
    /// Suggestions requested per tag lookup.
    pub suggestion_limit: u32,
    /// Quiet period before a tag lookup fires, in milliseconds.
    pub quiet_period_ms: u64,
    /// Event loop tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: 40,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            tick_rate_ms: 100,
        }
    }
}

impl Settings {
    /// Validate these settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.page_limit == 0 {
            return Err(ConfigError::ValidationError(
                "page_limit must be greater than zero".to_string(),
            ));
        }

        if self.suggestion_limit == 0 {
            return Err(ConfigError::ValidationError(
                "suggestion_limit must be greater than zero".to_string(),
            ));
        }

        if self.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Image preview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Share of the terminal the preview may cover, in (0, 1].
    pub viewport_fraction: f64,
    /// Scale small images up to the viewport.
    pub upscale: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            viewport_fraction: DEFAULT_VIEWPORT_FRACTION,
            upscale: false,
        }
    }
}

impl PreviewSettings {
    /// The fit policy selected by `upscale`.
    pub fn fit_policy(&self) -> FitPolicy {
        if self.upscale {
            FitPolicy::Fill
        } else {
            FitPolicy::ShrinkOnly
        }
    }

    /// Validate these settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport_fraction > 0.0 && self.viewport_fraction <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "preview.viewport_fraction {} must be in (0, 1]",
                self.viewport_fraction
            )));
        }
        Ok(())
    }
}
