use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Audio subsystem error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification endpoint unreachable: {0}")]
    Connectivity(String),

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Sample source failed to initialize: {0}")]
    InitFailed(String),

    #[error("Sample source disconnected")]
    Disconnected,

    #[error("Sample source stuck: {count} consecutive invalid readings")]
    StuckSource { count: u64 },

    #[error("Sample stream exhausted after {samples_read} samples")]
    Exhausted { samples_read: u64 },

    #[error("No audio data for {duration:?}")]
    NoDataTimeout { duration: Duration },

    #[error("Fatal audio error: {0}")]
    Fatal(String),
}

#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    Retry { max_attempts: u32, delay: Duration },
    Ignore,
    Fatal,
}

impl AppError {
    /// What the control loop should do when this error reaches it.
    ///
    /// Peripheral init failures halt the process; connectivity problems are
    /// reported and ignored (the alert path simply cannot succeed until the
    /// network comes back); everything transient along the audio path gets a
    /// bounded retry.
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            AppError::Audio(AudioError::Disconnected) => RecoveryStrategy::Retry {
                max_attempts: 5,
                delay: Duration::from_secs(2),
            },
            AppError::Audio(AudioError::NoDataTimeout { .. }) => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay: Duration::from_millis(500),
            },
            AppError::Connectivity(_) => RecoveryStrategy::Ignore,
            AppError::Audio(_) | AppError::Config(_) | AppError::Fatal(_) => {
                RecoveryStrategy::Fatal
            }
        }
    }
}
