use thiserror::Error;

/// The opaque inference runtime behind a narrow seam, so the concrete
/// engine is swappable and mockable without touching detection logic.
///
/// The engine is configured with a fixed input length and produces either a
/// two-channel `[safe, dangerous]` distribution or a single sigmoid neuron;
/// interpreting that output is the adapter's job, not the engine's.
pub trait InferenceEngine: Send {
    fn input_len(&self) -> usize;

    /// Run one inference pass over the window. The engine must never return
    /// stale output on failure.
    fn invoke(&mut self, window: &[i16]) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Inference pass failed: {0}")]
    InvokeFailed(String),

    #[error("Unexpected output shape: {channels} channels")]
    BadOutputShape { channels: usize },
}
