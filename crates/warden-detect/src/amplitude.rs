use crate::config::AmplitudeConfig;
use crate::engine::DetectorEngine;
use crate::types::{DetectError, DetectionEvent, DetectorState};

/// Debounced amplitude detector.
///
/// A loud sound is an oscillating waveform, so its absolute sample value
/// crosses the threshold many times per period; naive edge detection would
/// count one bang as hundreds of events. Two guards suppress that:
/// edge detection (a high sample only counts when the previous sample was
/// low) and a cooldown measured in stream time since the last emitted event.
/// Stream time equals wall time for a live blocking source and keeps the
/// machine deterministic when a window is scanned in one burst.
pub struct AmplitudeDetector {
    threshold: i32,
    cooldown_ms: u64,
    window_len: usize,
    sample_rate_hz: u32,
    was_above: bool,
    last_event_ms: Option<u64>,
    event_seq: u64,
    samples_processed: u64,
}

impl AmplitudeDetector {
    pub fn new(config: &AmplitudeConfig, window_len: usize, sample_rate_hz: u32) -> Self {
        Self {
            threshold: config.threshold as i32,
            cooldown_ms: config.cooldown_ms,
            window_len,
            sample_rate_hz,
            was_above: false,
            last_event_ms: None,
            event_seq: 0,
            samples_processed: 0,
        }
    }

    /// Feed one valid sample. Sentinel readings must already be filtered
    /// out upstream.
    pub fn on_sample(&mut self, sample: i16) -> Option<DetectionEvent> {
        self.samples_processed += 1;
        let magnitude = (sample as i32).abs();
        let is_above = magnitude > self.threshold;

        let mut event = None;
        if is_above && !self.was_above && self.cooldown_elapsed() {
            self.event_seq += 1;
            let now_ms = self.stream_ms();
            self.last_event_ms = Some(now_ms);
            event = Some(DetectionEvent {
                timestamp_ms: now_ms,
                confidence: magnitude as f32 / i16::MAX as f32,
                seq: self.event_seq,
            });
        }

        self.was_above = is_above;
        event
    }

    /// Events emitted since construction (or the last `reset`).
    pub fn event_count(&self) -> u64 {
        self.event_seq
    }

    fn stream_ms(&self) -> u64 {
        self.samples_processed * 1000 / self.sample_rate_hz as u64
    }

    fn cooldown_elapsed(&self) -> bool {
        match self.last_event_ms {
            None => true,
            Some(t) => self.stream_ms().saturating_sub(t) > self.cooldown_ms,
        }
    }
}

impl DetectorEngine for AmplitudeDetector {
    fn process(&mut self, window: &[i16]) -> Result<Option<DetectionEvent>, DetectError> {
        if window.len() != self.window_len {
            return Err(DetectError::WindowSizeMismatch {
                expected: self.window_len,
                actual: window.len(),
            });
        }

        // Scan the whole window so state and the event counter stay correct
        // across window boundaries, but surface only the first event.
        let mut first = None;
        for &sample in window {
            let event = self.on_sample(sample);
            if first.is_none() {
                first = event;
            }
        }
        Ok(first)
    }

    fn reset(&mut self) {
        self.was_above = false;
        self.last_event_ms = None;
        self.event_seq = 0;
        self.samples_processed = 0;
    }

    fn current_state(&self) -> DetectorState {
        if self.was_above {
            DetectorState::Above
        } else {
            DetectorState::Below
        }
    }

    fn required_window_len(&self) -> usize {
        self.window_len
    }

    fn required_sample_rate(&self) -> u32 {
        self.sample_rate_hz
    }
}
