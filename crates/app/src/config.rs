use std::path::Path;

use clap::Parser;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use warden_alert::AlertConfig;
use warden_camera::CameraConfig;
use warden_detect::{DetectorConfig, DetectorMode};
use warden_foundation::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "warden",
    about = "Acoustic sentinel: watches an audio stream for dangerous sounds and posts a photo alert"
)]
pub struct Cli {
    /// Path to the configuration file (TOML). Defaults to `warden.toml` in
    /// the working directory when present.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the detector mode (`ml` or `amplitude`).
    #[arg(long)]
    pub mode: Option<String>,

    /// Accept invalid TLS certificates. Unsafe; off unless explicitly
    /// requested.
    #[arg(long)]
    pub insecure_tls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSourceKind {
    Wav,
    Mic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSourceConfig {
    pub kind: AudioSourceKind,
    pub wav_path: Option<String>,
    pub loop_playback: bool,
    /// Opt-in liveness bound on consecutive invalid readings. `None`
    /// blocks forever on a stuck peripheral.
    pub max_consecutive_invalid: Option<u64>,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            kind: AudioSourceKind::Wav,
            wav_path: None,
            loop_playback: true,
            max_consecutive_invalid: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppCameraConfig {
    /// Image served by the file-backed camera.
    pub image_path: String,
    pub sensor: CameraConfig,
}

impl Default for AppCameraConfig {
    fn default() -> Self {
        Self {
            image_path: "alert.jpg".to_string(),
            sensor: CameraConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the exported sound model (ONNX).
    pub path: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/sound_model.onnx".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Pause between decision cycles.
    pub pause_ms: u64,
    /// Startup budget for the notification endpoint to become reachable.
    pub network_wait_secs: u64,
    /// Interval between reachability probes within that budget.
    pub network_probe_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            pause_ms: 1000,
            network_wait_secs: 20,
            network_probe_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub audio: AudioSourceConfig,
    pub detector: DetectorConfig,
    pub model: ModelConfig,
    pub camera: AppCameraConfig,
    pub alert: AlertConfig,
    pub poll: PollConfig,
}

impl AppConfig {
    /// Load from an explicit path (required to exist), then let
    /// `WARDEN_`-prefixed environment variables override file values.
    pub fn from_path(config_path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::build(Some(config_path.as_ref()), true)
    }

    /// Load from `warden.toml` when present, falling back to defaults plus
    /// environment overrides.
    pub fn load(cli_path: Option<&str>) -> Result<Self, AppError> {
        match cli_path {
            Some(path) => Self::build(Some(Path::new(path)), true),
            None => {
                let default_path = Path::new("warden.toml");
                if default_path.exists() {
                    tracing::info!("Loading configuration from: {}", default_path.display());
                    Self::build(Some(default_path), true)
                } else {
                    tracing::warn!(
                        "No configuration file at 'warden.toml'. Using defaults and environment variables."
                    );
                    Self::build(None, false)
                }
            }
        }
    }

    fn build(path: Option<&Path>, required: bool) -> Result<Self, AppError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(required));
        }

        // Environment variables override the file's settings.
        builder = builder.add_source(Environment::with_prefix("WARDEN").separator("__"));

        let config = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build config: {e}")))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to deserialize config: {e}")))?;

        app_config.validate()?;
        Ok(app_config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) -> Result<(), AppError> {
        if let Some(mode) = &cli.mode {
            self.detector.mode = match mode.to_lowercase().as_str() {
                "ml" => DetectorMode::Ml,
                "amplitude" => DetectorMode::Amplitude,
                other => {
                    return Err(AppError::Config(format!(
                        "Unknown detector mode '{other}' (expected 'ml' or 'amplitude')"
                    )))
                }
            };
        }
        if cli.insecure_tls {
            self.alert.transport.insecure_tls = true;
        }
        Ok(())
    }

    pub fn validate(&mut self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.detector.window_size_samples == 0 {
            errors.push("detector.window_size_samples must be >0".to_string());
        }
        if self.detector.sample_rate_hz == 0 {
            errors.push("detector.sample_rate_hz must be >0".to_string());
        }
        if !(0.0..=1.0).contains(&self.detector.ml.danger_threshold) {
            tracing::warn!(
                "Invalid danger_threshold {}. Clamping to 0.70.",
                self.detector.ml.danger_threshold
            );
            self.detector.ml.danger_threshold = 0.70;
        }
        if self.camera.sensor.fb_count == 0 {
            errors.push("camera.fb_count must be >0".to_string());
        }
        if self.alert.transport.response_timeout_secs == 0 {
            errors.push("alert.transport.response_timeout_secs must be >0".to_string());
        }
        if self.audio.kind == AudioSourceKind::Wav && self.audio.wav_path.is_none() {
            // Not fatal at load time; the source builder reports it when the
            // wav source is actually selected.
            tracing::warn!("audio.kind = \"wav\" but audio.wav_path is not set");
        }

        if !errors.is_empty() {
            return Err(AppError::Config(format!(
                "Critical config validation errors: {errors:?}"
            )));
        }
        Ok(())
    }
}
