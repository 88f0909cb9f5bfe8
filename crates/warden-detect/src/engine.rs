use crate::types::{DetectError, DetectionEvent, DetectorState};

/// A trait for danger-detection engines.
///
/// This defines the common interface for the decision strategies (ML
/// classifier and amplitude threshold), allowing a configuration choice to
/// select one without duplicating the pipeline around it.
pub trait DetectorEngine: Send {
    /// Consume one full window of valid samples. At most one event is
    /// surfaced per window; the controller's one-shot guard makes further
    /// events in the same window irrelevant for alerting.
    fn process(&mut self, window: &[i16]) -> Result<Option<DetectionEvent>, DetectError>;
    fn reset(&mut self);
    fn current_state(&self) -> DetectorState;
    fn required_window_len(&self) -> usize;
    fn required_sample_rate(&self) -> u32;
}
