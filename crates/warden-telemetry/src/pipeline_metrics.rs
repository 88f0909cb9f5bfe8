use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared counters for the detection-and-alert pipeline.
///
/// Everything is an `Arc`'d atomic so a clone can be handed to any stage
/// (and, on a future multi-threaded port, read from a dashboard) without
/// locking the control loop.
#[derive(Clone)]
pub struct PipelineMetrics {
    // Window assembly
    pub windows_filled: Arc<AtomicU64>,
    pub samples_discarded: Arc<AtomicU64>, // sentinel readings dropped by the builder

    // Classification
    pub inferences: Arc<AtomicU64>,
    pub inference_failures: Arc<AtomicU64>,
    pub last_confidence_milli: Arc<AtomicU64>, // probability * 1000

    // Decisions
    pub detections: Arc<AtomicU64>,
    pub last_detection_time: Arc<RwLock<Option<Instant>>>,

    // Alert delivery
    pub alerts_attempted: Arc<AtomicU64>,
    pub alerts_sent: Arc<AtomicU64>,
    pub capture_failures: Arc<AtomicU64>,
    pub transport_failures: Arc<AtomicU64>,
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self {
            windows_filled: Arc::new(AtomicU64::new(0)),
            samples_discarded: Arc::new(AtomicU64::new(0)),
            inferences: Arc::new(AtomicU64::new(0)),
            inference_failures: Arc::new(AtomicU64::new(0)),
            last_confidence_milli: Arc::new(AtomicU64::new(0)),
            detections: Arc::new(AtomicU64::new(0)),
            last_detection_time: Arc::new(RwLock::new(None)),
            alerts_attempted: Arc::new(AtomicU64::new(0)),
            alerts_sent: Arc::new(AtomicU64::new(0)),
            capture_failures: Arc::new(AtomicU64::new(0)),
            transport_failures: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_window(&self, discarded: u64) {
        self.windows_filled.fetch_add(1, Ordering::Relaxed);
        self.samples_discarded.fetch_add(discarded, Ordering::Relaxed);
    }

    pub fn record_inference(&self, confidence: f32) {
        self.inferences.fetch_add(1, Ordering::Relaxed);
        self.last_confidence_milli
            .store((confidence.clamp(0.0, 1.0) * 1000.0) as u64, Ordering::Relaxed);
    }

    pub fn record_inference_failure(&self) {
        self.inferences.fetch_add(1, Ordering::Relaxed);
        self.inference_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
        *self.last_detection_time.write() = Some(Instant::now());
    }

    pub fn last_confidence(&self) -> f32 {
        self.last_confidence_milli.load(Ordering::Relaxed) as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_accounting_accumulates_discards() {
        let m = PipelineMetrics::new();
        m.record_window(3);
        m.record_window(0);
        m.record_window(7);
        assert_eq!(m.windows_filled.load(Ordering::Relaxed), 3);
        assert_eq!(m.samples_discarded.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn confidence_round_trips_through_milli_encoding() {
        let m = PipelineMetrics::new();
        m.record_inference(0.71);
        assert!((m.last_confidence() - 0.71).abs() < 0.001);
    }

    #[test]
    fn inference_failure_counts_as_inference() {
        let m = PipelineMetrics::new();
        m.record_inference_failure();
        assert_eq!(m.inferences.load(Ordering::Relaxed), 1);
        assert_eq!(m.inference_failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn detection_stamps_last_time() {
        let m = PipelineMetrics::new();
        assert!(m.last_detection_time.read().is_none());
        m.record_detection();
        assert!(m.last_detection_time.read().is_some());
    }
}
