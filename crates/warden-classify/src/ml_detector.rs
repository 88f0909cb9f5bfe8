use warden_detect::{
    DetectError, DetectionEvent, DetectorEngine, DetectorState, MlConfig, ProbabilityGate,
};
use warden_telemetry::PipelineMetrics;

use crate::classifier::{ClassifyError, SoundClassifier};
use crate::engine::InferenceEngine;

/// ML detection engine: classifier adapter plus the one-shot probability
/// gate. Each window is an independent decision; there is no debounce state
/// because the window length (one second) is already the event granularity.
pub struct MlDetector<E> {
    classifier: SoundClassifier<E>,
    gate: ProbabilityGate,
    sample_rate_hz: u32,
    state: DetectorState,
    event_seq: u64,
    windows_processed: u64,
    metrics: Option<PipelineMetrics>,
}

impl<E: InferenceEngine> MlDetector<E> {
    pub fn new(engine: E, config: &MlConfig, sample_rate_hz: u32) -> Self {
        Self {
            classifier: SoundClassifier::new(engine),
            gate: ProbabilityGate::new(config.danger_threshold),
            sample_rate_hz,
            state: DetectorState::Below,
            event_seq: 0,
            windows_processed: 0,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn stream_ms(&self) -> u64 {
        self.windows_processed * self.classifier.input_len() as u64 * 1000
            / self.sample_rate_hz as u64
    }
}

impl<E: InferenceEngine> DetectorEngine for MlDetector<E> {
    fn process(&mut self, window: &[i16]) -> Result<Option<DetectionEvent>, DetectError> {
        self.windows_processed += 1;

        let confidence = match self.classifier.classify(window) {
            Ok(p) => {
                if let Some(m) = &self.metrics {
                    m.record_inference(p);
                }
                p
            }
            Err(ClassifyError::WindowSizeMismatch { expected, actual }) => {
                return Err(DetectError::WindowSizeMismatch { expected, actual });
            }
            Err(ClassifyError::Inference(e)) => {
                // Fail-safe-negative: a classifier glitch must not produce a
                // spurious alert. The failure is reported, the window is
                // scored 0.0, and the run continues.
                tracing::warn!("Inference failed, scoring window as safe: {}", e);
                if let Some(m) = &self.metrics {
                    m.record_inference_failure();
                }
                0.0
            }
        };

        tracing::debug!(confidence, "Window classified");

        if self.gate.fires(confidence) {
            self.state = DetectorState::Above;
            self.event_seq += 1;
            Ok(Some(DetectionEvent {
                timestamp_ms: self.stream_ms(),
                confidence,
                seq: self.event_seq,
            }))
        } else {
            self.state = DetectorState::Below;
            Ok(None)
        }
    }

    fn reset(&mut self) {
        self.state = DetectorState::Below;
        self.event_seq = 0;
        self.windows_processed = 0;
    }

    fn current_state(&self) -> DetectorState {
        self.state
    }

    fn required_window_len(&self) -> usize {
        self.classifier.input_len()
    }

    fn required_sample_rate(&self) -> u32 {
        self.sample_rate_hz
    }
}
