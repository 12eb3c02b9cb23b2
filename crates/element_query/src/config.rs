//! Runtime configuration for the query engine.

use crate::units::DEFAULT_EM_PX;
use std::env;

/// Environment variable overriding the fallback em size.
const FALLBACK_EM_ENV: &str = "ELEMENT_QUERY_FALLBACK_EM_PX";

/// Engine configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Em size substituted when the host cannot produce a computed font
    /// size for an element (or for the document root).
    pub fallback_em_px: f32,
}

impl EngineConfig {
    /// Construct a configuration with an explicit fallback em size.
    /// Non-positive values fall back to the default of 16.
    pub fn new(fallback_em_px: f32) -> Self {
        let fallback = if fallback_em_px > 0.0 {
            fallback_em_px
        } else {
            DEFAULT_EM_PX
        };
        Self {
            fallback_em_px: fallback,
        }
    }

    /// Load configuration from the environment; absent or unparsable values
    /// use the defaults.
    pub fn from_env() -> Self {
        let fallback = env::var(FALLBACK_EM_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<f32>().ok())
            .unwrap_or(DEFAULT_EM_PX);
        Self::new(fallback)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EM_PX)
    }
}
