//! End-to-end alert flow over a file-backed camera, with delivery faked at
//! the transport seam.

use std::sync::atomic::Ordering;
use std::sync::Mutex;

use warden_alert::{AlertConfig, AlertController, AlertTransport, CycleOutcome, TransportError};
use warden_camera::{CameraConfig, FileImageSource};
use warden_telemetry::PipelineMetrics;

struct CapturingTransport {
    requests: Mutex<Vec<(String, String, Vec<u8>)>>,
    acknowledge: bool,
}

impl CapturingTransport {
    fn new(acknowledge: bool) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            acknowledge,
        }
    }
}

impl AlertTransport for &CapturingTransport {
    fn send(&self, caption: &str, recipient: &str, image: &[u8]) -> Result<bool, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((caption.to_owned(), recipient.to_owned(), image.to_vec()));
        Ok(self.acknowledge)
    }
}

fn jpeg_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("alert.jpg");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).unwrap();
    path
}

fn alert_config() -> AlertConfig {
    AlertConfig {
        chat_id: "7318781359".into(),
        ..Default::default()
    }
}

#[test]
fn detection_carries_image_and_caption_to_the_transport() {
    let dir = tempfile::tempdir().unwrap();
    let camera = FileImageSource::new(jpeg_fixture(&dir), &CameraConfig::default()).unwrap();
    let transport = CapturingTransport::new(true);
    let metrics = PipelineMetrics::new();
    let mut ctrl = AlertController::new(camera, &transport, &alert_config())
        .with_metrics(metrics.clone());

    assert_eq!(ctrl.on_cycle(true), CycleOutcome::Sent);

    let requests = transport.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (caption, recipient, image) = &requests[0];
    assert_eq!(caption, "⚠️ ALERT: Dangerous sound detected!");
    assert_eq!(recipient, "7318781359");
    assert_eq!(image, &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);

    assert_eq!(metrics.alerts_attempted.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.alerts_sent.load(Ordering::Relaxed), 1);
}

#[test]
fn one_alert_per_run_even_with_constant_detections() {
    let dir = tempfile::tempdir().unwrap();
    let camera = FileImageSource::new(jpeg_fixture(&dir), &CameraConfig::default()).unwrap();
    let transport = CapturingTransport::new(true);
    let mut ctrl = AlertController::new(camera, &transport, &alert_config());

    for cycle in 0..50 {
        let outcome = ctrl.on_cycle(true);
        if cycle == 0 {
            assert_eq!(outcome, CycleOutcome::Sent);
        } else {
            assert_eq!(outcome, CycleOutcome::AlreadyAlerted);
        }
    }
    assert_eq!(transport.requests.lock().unwrap().len(), 1);
}

#[test]
fn rejected_delivery_drops_the_alert_for_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let camera = FileImageSource::new(jpeg_fixture(&dir), &CameraConfig::default()).unwrap();
    let transport = CapturingTransport::new(false);
    let metrics = PipelineMetrics::new();
    let mut ctrl = AlertController::new(camera, &transport, &alert_config())
        .with_metrics(metrics.clone());

    assert_eq!(ctrl.on_cycle(true), CycleOutcome::SendFailed);
    assert_eq!(ctrl.on_cycle(true), CycleOutcome::AlreadyAlerted);

    assert_eq!(transport.requests.lock().unwrap().len(), 1);
    assert_eq!(metrics.transport_failures.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.alerts_sent.load(Ordering::Relaxed), 0);
}
