use serde::{Deserialize, Serialize};

use super::constants::{
    AMPLITUDE_THRESHOLD, DANGER_THRESHOLD, EVENT_COOLDOWN_MS, SAMPLE_RATE_HZ, WINDOW_SIZE_SAMPLES,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorMode {
    /// Classifier-backed detection - the default path.
    Ml,
    /// Raw amplitude threshold with debounce; kept for bring-up and for
    /// targets without an inference engine.
    Amplitude,
}

impl Default for DetectorMode {
    fn default() -> Self {
        Self::Ml
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MlConfig {
    /// Strict gate: a window fires only when probability > threshold.
    pub danger_threshold: f32,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            danger_threshold: DANGER_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmplitudeConfig {
    pub threshold: i16,
    pub cooldown_ms: u64,
}

impl Default for AmplitudeConfig {
    fn default() -> Self {
        Self {
            threshold: AMPLITUDE_THRESHOLD,
            cooldown_ms: EVENT_COOLDOWN_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub mode: DetectorMode,
    pub ml: MlConfig,
    pub amplitude: AmplitudeConfig,
    pub window_size_samples: usize,
    pub sample_rate_hz: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            mode: DetectorMode::default(),
            ml: MlConfig::default(),
            amplitude: AmplitudeConfig::default(),
            window_size_samples: WINDOW_SIZE_SAMPLES,
            sample_rate_hz: SAMPLE_RATE_HZ,
        }
    }
}

impl DetectorConfig {
    pub fn window_duration_ms(&self) -> f32 {
        (self.window_size_samples as f32 * 1000.0) / self.sample_rate_hz as f32
    }
}
