use ort::{
    session::{builder::GraphOptimizationLevel, builder::SessionBuilder, Session},
    value::Value,
};

use crate::engine::{InferenceEngine, InferenceError};

/// ONNX Runtime backend for the sound model.
///
/// The exported model takes a `[1, input_len]` float window normalized to
/// [-1, 1] and produces either `[safe, dangerous]` or a single sigmoid
/// neuron; both shapes are handled by the adapter.
pub struct OnnxEngine {
    session: Session,
    input_len: usize,
}

impl OnnxEngine {
    pub fn load(model_path: &str, input_len: usize) -> Result<Self, InferenceError> {
        let session = SessionBuilder::new()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| InferenceError::ModelLoad(e.to_string()))?;

        tracing::info!(
            model = model_path,
            inputs = session.inputs.len(),
            outputs = session.outputs.len(),
            "Sound model loaded"
        );

        Ok(Self { session, input_len })
    }
}

impl InferenceEngine for OnnxEngine {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn invoke(&mut self, window: &[i16]) -> Result<Vec<f32>, InferenceError> {
        let data: Vec<f32> = window
            .iter()
            .map(|&s| s as f32 / i16::MAX as f32)
            .collect();

        let input = Value::from_array((vec![1usize, self.input_len], data))
            .map_err(|e| InferenceError::InvokeFailed(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![input])
            .map_err(|e| InferenceError::InvokeFailed(e.to_string()))?;

        let (_, values) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::InvokeFailed(e.to_string()))?;

        Ok(values.to_vec())
    }
}
