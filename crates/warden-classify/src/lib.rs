pub mod classifier;
pub mod engine;
pub mod ml_detector;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use classifier::{danger_probability, ClassifyError, SoundClassifier};
pub use engine::{InferenceEngine, InferenceError};
pub use ml_detector::MlDetector;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEngine;
