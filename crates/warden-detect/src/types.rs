use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Signal at or below the decision threshold; the next crossing may emit.
    Below,
    /// Signal above the decision threshold; further high samples are the
    /// same physical event and must not re-emit.
    Above,
}

/// One positive decision. `seq` increases monotonically per run;
/// `timestamp_ms` is stream time (samples processed so far converted to
/// milliseconds), which tracks wall time for a live blocking source.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    pub timestamp_ms: u64,
    pub confidence: f32,
    pub seq: u64,
}

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Expected {expected} samples, got {actual}")]
    WindowSizeMismatch { expected: usize, actual: usize },

    #[error("Detection engine failure: {0}")]
    Engine(String),
}
