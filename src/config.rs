//! Host settings parsed from environment variables.

use std::env::{self, VarError};

use tracing::{debug, warn};
use whiteboard::config::WhiteboardConfig;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `EnvFilter` directive for [`crate::init_tracing`].
    pub log_filter: String,
    pub whiteboard: WhiteboardConfig,
}

impl Settings {
    /// Build typed settings from environment variables.
    ///
    /// Optional:
    /// - `MOCKVIEW_LOG`: tracing filter, default `info`
    /// - `WHITEBOARD_HIT_TOLERANCE`: default 5
    /// - `WHITEBOARD_MIN_RECT_SIZE`: default 10
    /// - `WHITEBOARD_MIN_CIRCLE_RADIUS`: default 5
    /// - `WHITEBOARD_STROKE_COLOR`: default `#000000`
    /// - `WHITEBOARD_STROKE_WIDTH`: default 2
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a numeric variable is not a positive
    /// finite number or any variable is not unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = WhiteboardConfig::default();
        let whiteboard = WhiteboardConfig {
            hit_tolerance: env_parse_f64("WHITEBOARD_HIT_TOLERANCE", defaults.hit_tolerance)?,
            min_rect_size: env_parse_f64("WHITEBOARD_MIN_RECT_SIZE", defaults.min_rect_size)?,
            min_circle_radius: env_parse_f64("WHITEBOARD_MIN_CIRCLE_RADIUS", defaults.min_circle_radius)?,
            stroke_color: env_string("WHITEBOARD_STROKE_COLOR")?.unwrap_or(defaults.stroke_color),
            stroke_width: env_parse_f64("WHITEBOARD_STROKE_WIDTH", defaults.stroke_width)?,
        };
        let log_filter = env_string("MOCKVIEW_LOG")?.unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Self { log_filter, whiteboard })
    }

    /// Read a `.env` file from the working directory if there is one, then
    /// build settings with [`Settings::from_env`]. Variables already set in
    /// the environment win over the file.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_env()
    }
}

/// Trimmed value of `key`; unset or blank is `None`.
fn env_string(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v.trim().to_owned())),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var: key }),
    }
}

fn env_parse_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = env_string(key)? else {
        return Ok(default);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidNumber { var: key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
