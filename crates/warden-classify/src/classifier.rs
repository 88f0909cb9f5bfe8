use thiserror::Error;

use crate::engine::{InferenceEngine, InferenceError};

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Window length {actual} does not match engine input length {expected}")]
    WindowSizeMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Adapter over the opaque engine: binds one window, runs one pass, and
/// reduces the output tensor to P(dangerous).
pub struct SoundClassifier<E> {
    engine: E,
}

impl<E: InferenceEngine> SoundClassifier<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn input_len(&self) -> usize {
        self.engine.input_len()
    }

    /// Precondition: `window.len() == input_len()`. A mismatch is a
    /// programming error in the pipeline wiring, reported as a hard error
    /// rather than classified on a truncated window.
    pub fn classify(&mut self, window: &[i16]) -> Result<f32, ClassifyError> {
        let expected = self.engine.input_len();
        if window.len() != expected {
            debug_assert_eq!(window.len(), expected, "window/engine length drift");
            return Err(ClassifyError::WindowSizeMismatch {
                expected,
                actual: window.len(),
            });
        }

        let output = self.engine.invoke(window)?;
        Ok(danger_probability(&output)?)
    }
}

/// Fixed output-shape contract: a two-channel output is `[safe, dangerous]`
/// and the second channel is the result; a one-channel output is a sigmoid
/// and is the result directly.
pub fn danger_probability(output: &[f32]) -> Result<f32, InferenceError> {
    match output.len() {
        2 => Ok(output[1]),
        1 => Ok(output[0]),
        channels => Err(InferenceError::BadOutputShape { channels }),
    }
}
