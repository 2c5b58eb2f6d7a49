use serde::{Deserialize, Serialize};

/// Tuning of the force-directed pass. Every field falls back to its default
/// when missing from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub iterations: usize,
    pub start_temperature: f64,
    /// Upper bound of a step relative to the displacement length.
    pub displacement_ratio: f64,
    pub epsilon: f64,
    pub seed: u64,
    /// Width of the band a coordinate re-enters at after leaving `[0, 1]`.
    pub edge_jitter: f64,
}

impl LayoutSettings {
    pub const DEFAULT_ITERATIONS: usize = 40;
    pub const DEFAULT_START_TEMPERATURE: f64 = 0.05;
    pub const DEFAULT_DISPLACEMENT_RATIO: f64 = 0.4;
    pub const DEFAULT_EPSILON: f64 = 1e-6;
    pub const DEFAULT_SEED: u64 = 46;
    pub const DEFAULT_EDGE_JITTER: f64 = 0.2;
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            start_temperature: Self::DEFAULT_START_TEMPERATURE,
            displacement_ratio: Self::DEFAULT_DISPLACEMENT_RATIO,
            epsilon: Self::DEFAULT_EPSILON,
            seed: Self::DEFAULT_SEED,
            edge_jitter: Self::DEFAULT_EDGE_JITTER,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub layout: LayoutSettings,
}
