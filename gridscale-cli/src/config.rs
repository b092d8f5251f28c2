use gridscale::SUPPORTED_FACTOR_RANGE;
use serde::{Deserialize, Serialize};

/// Configuration for the CLI front end
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct CliConfig {
    /// Smallest scale factor accepted at this boundary. The core transform
    /// only requires finite and > 0; the surveying domain is narrower.
    pub min_factor: f64,
    /// Largest scale factor accepted at this boundary
    pub max_factor: f64,
    /// Pretty-print the output artifact
    #[serde(default)]
    pub pretty_output: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            min_factor: *SUPPORTED_FACTOR_RANGE.start(),
            max_factor: *SUPPORTED_FACTOR_RANGE.end(),
            pretty_output: true,
        }
    }
}

impl CliConfig {
    pub fn accepts(&self, factor: f64) -> bool {
        factor.is_finite() && factor >= self.min_factor && factor <= self.max_factor
    }
}
