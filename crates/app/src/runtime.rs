use std::time::Duration;

use warden_alert::{AlertController, AlertTransport, CycleOutcome};
use warden_audio::{SampleSource, WindowBuilder};
use warden_camera::ImageSource;
use warden_detect::{AmplitudeDetector, DetectorEngine, DetectorMode};
use warden_foundation::{AppError, SharedClock};
use warden_telemetry::PipelineMetrics;

use crate::config::{AppConfig, AudioSourceKind};

pub type DynController = AlertController<Box<dyn ImageSource>, Box<dyn AlertTransport>>;

/// The single-threaded poll loop: fill a window, run the detector, hand the
/// decision to the alert controller, pause, repeat. Blocking operations
/// (sample pull, inference, transport) occupy the only thread of control
/// for their duration.
pub struct SentinelLoop {
    source: Box<dyn SampleSource>,
    builder: WindowBuilder,
    detector: Box<dyn DetectorEngine>,
    controller: DynController,
    metrics: PipelineMetrics,
    pause: Duration,
    clock: SharedClock,
}

impl SentinelLoop {
    pub fn new(
        source: Box<dyn SampleSource>,
        builder: WindowBuilder,
        detector: Box<dyn DetectorEngine>,
        controller: DynController,
        metrics: PipelineMetrics,
        pause: Duration,
        clock: SharedClock,
    ) -> Self {
        Self {
            source,
            builder,
            detector,
            controller,
            metrics,
            pause,
            clock,
        }
    }

    /// One acquire -> classify -> decide -> alert cycle.
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, AppError> {
        let window = self.builder.fill(self.source.as_mut())?;
        let event = self
            .detector
            .process(window)
            .map_err(|e| AppError::Fatal(format!("detector: {e}")))?;

        self.metrics
            .record_window(self.builder.last_fill_discarded());

        let decision = event.is_some();
        if let Some(event) = &event {
            self.metrics.record_detection();
            tracing::info!(
                seq = event.seq,
                confidence = event.confidence,
                timestamp_ms = event.timestamp_ms,
                "Dangerous sound detected"
            );
        }

        Ok(self.controller.on_cycle(decision))
    }

    /// Poll until the sample source fails or the process is killed. The
    /// loop keeps classifying after an alert has been sent; the one-shot
    /// guard makes further detections no-ops.
    pub fn run(&mut self) -> Result<(), AppError> {
        tracing::info!("Sentinel loop started");
        loop {
            match self.run_cycle()? {
                CycleOutcome::Sent => {
                    tracing::info!("Alert delivered; continuing to monitor")
                }
                CycleOutcome::SendFailed => {
                    tracing::warn!("Alert lost; continuing to monitor")
                }
                CycleOutcome::Idle
                | CycleOutcome::AlreadyAlerted
                | CycleOutcome::CaptureFailed => {}
            }
            self.clock.sleep(self.pause);
        }
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }
}

/// Select the sample source from configuration.
pub fn build_source(cfg: &AppConfig) -> Result<Box<dyn SampleSource>, AppError> {
    match cfg.audio.kind {
        AudioSourceKind::Wav => {
            let path = cfg.audio.wav_path.as_deref().ok_or_else(|| {
                AppError::Config("audio.kind = \"wav\" requires audio.wav_path".into())
            })?;
            let source = warden_audio::WavFileSource::open(path)?;
            Ok(if cfg.audio.loop_playback {
                Box::new(source.looping())
            } else {
                Box::new(source)
            })
        }
        AudioSourceKind::Mic => build_mic_source(),
    }
}

#[cfg(feature = "mic")]
fn build_mic_source() -> Result<Box<dyn SampleSource>, AppError> {
    Ok(Box::new(warden_audio::mic::MicSource::open()?))
}

#[cfg(not(feature = "mic"))]
fn build_mic_source() -> Result<Box<dyn SampleSource>, AppError> {
    Err(AppError::Config(
        "audio.kind = \"mic\" requires building with the `mic` feature".into(),
    ))
}

/// Select the detection engine from configuration.
pub fn build_detector(
    cfg: &AppConfig,
    metrics: &PipelineMetrics,
) -> Result<Box<dyn DetectorEngine>, AppError> {
    match cfg.detector.mode {
        DetectorMode::Amplitude => Ok(Box::new(AmplitudeDetector::new(
            &cfg.detector.amplitude,
            cfg.detector.window_size_samples,
            cfg.detector.sample_rate_hz,
        ))),
        DetectorMode::Ml => build_ml_detector(cfg, metrics),
    }
}

#[cfg(feature = "onnx")]
fn build_ml_detector(
    cfg: &AppConfig,
    metrics: &PipelineMetrics,
) -> Result<Box<dyn DetectorEngine>, AppError> {
    let engine =
        warden_classify::OnnxEngine::load(&cfg.model.path, cfg.detector.window_size_samples)
            .map_err(|e| AppError::Fatal(format!("load sound model: {e}")))?;
    Ok(Box::new(
        warden_classify::MlDetector::new(engine, &cfg.detector.ml, cfg.detector.sample_rate_hz)
            .with_metrics(metrics.clone()),
    ))
}

#[cfg(not(feature = "onnx"))]
fn build_ml_detector(
    _cfg: &AppConfig,
    _metrics: &PipelineMetrics,
) -> Result<Box<dyn DetectorEngine>, AppError> {
    Err(AppError::Config(
        "detector.mode = \"ml\" requires building with the `onnx` feature; \
         use detector.mode = \"amplitude\" otherwise"
            .into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use warden_alert::{AlertConfig, TransportError};
    use warden_audio::ScriptedSource;
    use warden_camera::{CameraError, FramePool, ImageBuffer};
    use warden_detect::AmplitudeConfig;
    use warden_foundation::test_clock;

    struct StubCamera {
        pool: FramePool,
        acquires: Arc<AtomicUsize>,
    }

    impl ImageSource for StubCamera {
        fn acquire(&mut self) -> Result<ImageBuffer, CameraError> {
            self.acquires.fetch_add(1, Ordering::SeqCst);
            let permit = self.pool.try_acquire().ok_or(CameraError::PoolExhausted {
                fb_count: self.pool.fb_count(),
            })?;
            Ok(ImageBuffer::new(vec![0xFF, 0xD8], permit))
        }
    }

    struct StubTransport {
        sends: Arc<AtomicUsize>,
    }

    impl AlertTransport for StubTransport {
        fn send(&self, _: &str, _: &str, _: &[u8]) -> Result<bool, TransportError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn sentinel_with_samples(samples: Vec<i16>) -> (SentinelLoop, Arc<AtomicUsize>) {
        let sends = Arc::new(AtomicUsize::new(0));
        let camera: Box<dyn ImageSource> = Box::new(StubCamera {
            pool: FramePool::new(1),
            acquires: Arc::new(AtomicUsize::new(0)),
        });
        let transport: Box<dyn AlertTransport> = Box::new(StubTransport {
            sends: Arc::clone(&sends),
        });
        let controller = AlertController::new(camera, transport, &AlertConfig::default());

        // Cooldown zero: these tests exercise the loop wiring, not the
        // debounce timing (covered in warden-detect).
        let detector = AmplitudeDetector::new(
            &AmplitudeConfig {
                threshold: 4500,
                cooldown_ms: 0,
            },
            8,
            16_000,
        );

        let sentinel = SentinelLoop::new(
            Box::new(ScriptedSource::new(samples)),
            WindowBuilder::new(8),
            Box::new(detector),
            controller,
            PipelineMetrics::new(),
            Duration::from_millis(0),
            test_clock(),
        );
        (sentinel, sends)
    }

    #[test]
    fn quiet_windows_never_alert() {
        let (mut sentinel, sends) = sentinel_with_samples(vec![100; 16]);
        assert_eq!(sentinel.run_cycle().unwrap(), CycleOutcome::Idle);
        assert_eq!(sentinel.run_cycle().unwrap(), CycleOutcome::Idle);
        assert_eq!(sends.load(Ordering::SeqCst), 0);
        assert_eq!(sentinel.metrics().windows_filled.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn loud_window_triggers_exactly_one_alert() {
        // Second window carries the bang; later windows stay loud but the
        // one-shot guard holds.
        let mut samples = vec![100i16; 8];
        samples.extend_from_slice(&[100, 100, 9000, 100, 100, 100, 100, 100]);
        samples.extend_from_slice(&[9000; 8]);
        let (mut sentinel, sends) = sentinel_with_samples(samples);

        assert_eq!(sentinel.run_cycle().unwrap(), CycleOutcome::Idle);
        assert_eq!(sentinel.run_cycle().unwrap(), CycleOutcome::Sent);
        assert_eq!(sentinel.run_cycle().unwrap(), CycleOutcome::AlreadyAlerted);
        assert_eq!(sends.load(Ordering::SeqCst), 1);
        assert_eq!(sentinel.metrics().detections.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn exhausted_source_ends_the_run() {
        let (mut sentinel, _) = sentinel_with_samples(vec![100; 4]);
        assert!(matches!(sentinel.run_cycle(), Err(AppError::Audio(_))));
    }

    #[test]
    fn sentinel_readings_are_invisible_to_the_detector() {
        // Sentinels padding a quiet window must not fire the amplitude gate
        // and must be counted as discards.
        let mut samples = vec![0i16, 1, -1, 0];
        samples.extend_from_slice(&[100; 8]);
        let (mut sentinel, _) = sentinel_with_samples(samples);
        assert_eq!(sentinel.run_cycle().unwrap(), CycleOutcome::Idle);
        assert_eq!(
            sentinel.metrics().samples_discarded.load(Ordering::Relaxed),
            4
        );
    }
}
