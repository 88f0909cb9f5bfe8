pub mod amplitude;
pub mod config;
pub mod constants;
pub mod engine;
pub mod threshold;
pub mod types;

// Core exports - grouped and sorted alphabetically
pub use amplitude::AmplitudeDetector;
pub use config::{AmplitudeConfig, DetectorConfig, DetectorMode, MlConfig};
pub use constants::{AMPLITUDE_THRESHOLD, DANGER_THRESHOLD, EVENT_COOLDOWN_MS, SAMPLE_RATE_HZ, WINDOW_SIZE_SAMPLES};
pub use engine::DetectorEngine;
pub use threshold::ProbabilityGate;
pub use types::{DetectError, DetectionEvent, DetectorState};
