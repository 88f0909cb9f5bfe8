use warden_camera::{CameraError, ImageSource};
use warden_telemetry::PipelineMetrics;

use crate::config::AlertConfig;
use crate::transport::AlertTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No detection this cycle.
    Idle,
    /// Detection seen but the one-shot guard is already set.
    AlreadyAlerted,
    /// Image acquisition failed; the guard stays clear so a later cycle may
    /// retry.
    CaptureFailed,
    /// Alert delivered and acknowledged.
    Sent,
    /// Capture succeeded but delivery did not. The guard is set, so the
    /// alert is dropped for the remainder of the run.
    SendFailed,
}

/// Top-level orchestrator for the alert path. Owns the once-per-run guard:
/// `already_sent` transitions false -> true at most once and is never reset.
pub struct AlertController<C, T> {
    camera: C,
    transport: T,
    caption: String,
    recipient: String,
    already_sent: bool,
    metrics: Option<PipelineMetrics>,
}

impl<C: ImageSource, T: AlertTransport> AlertController<C, T> {
    pub fn new(camera: C, transport: T, config: &AlertConfig) -> Self {
        Self {
            camera,
            transport,
            caption: config.caption.clone(),
            recipient: config.chat_id.clone(),
            already_sent: false,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: PipelineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn already_sent(&self) -> bool {
        self.already_sent
    }

    pub fn on_cycle(&mut self, decision: bool) -> CycleOutcome {
        if !decision {
            return CycleOutcome::Idle;
        }
        if self.already_sent {
            tracing::debug!("Detection ignored: alert already sent this run");
            return CycleOutcome::AlreadyAlerted;
        }

        if let Some(m) = &self.metrics {
            m.alerts_attempted
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }

        let image = match self.camera.acquire() {
            Ok(image) => image,
            Err(e) => {
                // Not attributable to the alert itself: leave the guard
                // clear and let a later cycle retry.
                self.report_capture_failure(&e);
                return CycleOutcome::CaptureFailed;
            }
        };

        // At-most-once by design: mark before the delivery attempt
        // completes so a slow or failed send can never trigger a second
        // capture from the limited frame-buffer pool.
        self.already_sent = true;

        tracing::info!(
            image_bytes = image.len(),
            recipient = %self.recipient,
            "Danger detected - dispatching alert"
        );

        let result = self
            .transport
            .send(&self.caption, &self.recipient, image.as_bytes());

        // Release the frame buffer as soon as the transport call returns,
        // on every path.
        drop(image);

        match result {
            Ok(true) => {
                if let Some(m) = &self.metrics {
                    m.alerts_sent
                        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                }
                CycleOutcome::Sent
            }
            Ok(false) => {
                self.report_send_failure("service returned a non-success body");
                CycleOutcome::SendFailed
            }
            Err(e) => {
                self.report_send_failure(&e.to_string());
                CycleOutcome::SendFailed
            }
        }
    }

    fn report_capture_failure(&self, error: &CameraError) {
        tracing::error!("Image capture failed, alert not sent: {}", error);
        if let Some(m) = &self.metrics {
            m.capture_failures
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    }

    fn report_send_failure(&self, reason: &str) {
        // Loud on purpose: with the one-shot guard already set, this alert
        // is lost for the remainder of the run.
        tracing::error!(
            "Alert delivery failed ({}); no further alerts will be attempted this run",
            reason
        );
        if let Some(m) = &self.metrics {
            m.transport_failures
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    }
}
