//! Comprehensive detection tests
//!
//! Tests cover:
//! - Amplitude state machine (edge detection, cooldown buckets, re-arming)
//! - Full-rate windows through the `DetectorEngine` seam
//! - Probability gate boundary behavior

use warden_detect::constants::{
    AMPLITUDE_THRESHOLD, EVENT_COOLDOWN_MS, SAMPLE_RATE_HZ, WINDOW_SIZE_SAMPLES,
};
use warden_detect::{
    AmplitudeConfig, AmplitudeDetector, DetectorEngine, DetectorState, ProbabilityGate,
};

fn full_rate_detector() -> AmplitudeDetector {
    AmplitudeDetector::new(
        &AmplitudeConfig::default(),
        WINDOW_SIZE_SAMPLES,
        SAMPLE_RATE_HZ,
    )
}

/// One second of a loud sine wave at the configured sample rate.
fn loud_sine(amplitude: f32, freq_hz: f32) -> Vec<i16> {
    (0..WINDOW_SIZE_SAMPLES)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * freq_hz * i as f32 / SAMPLE_RATE_HZ as f32;
            (phase.sin() * amplitude) as i16
        })
        .collect()
}

// ─── Cooldown bucket behavior ───────────────────────────────────────

#[test]
fn sustained_loud_sine_emits_once_per_cooldown_bucket() {
    // A 440 Hz tone at amplitude 8000 crosses the 4500 threshold ~880
    // times per second. Without the cooldown that would be ~880 events;
    // with it, one per 100 ms bucket.
    let mut det = full_rate_detector();
    let mut events = 0u64;
    for &sample in &loud_sine(8000.0, 440.0) {
        if det.on_sample(sample).is_some() {
            events += 1;
        }
    }
    let buckets = 1000 / EVENT_COOLDOWN_MS;
    assert!(
        events >= buckets - 1 && events <= buckets,
        "expected ~{buckets} events for one second of sustained sound, got {events}"
    );
}

#[test]
fn quiet_sine_never_fires() {
    let mut det = full_rate_detector();
    for &sample in &loud_sine(3000.0, 440.0) {
        assert!(det.on_sample(sample).is_none());
    }
    assert_eq!(det.event_count(), 0);
}

// ─── Edge semantics ─────────────────────────────────────────────────

#[test]
fn single_spike_then_quiet_fires_exactly_once() {
    let mut det = full_rate_detector();
    let fired = det.on_sample(AMPLITUDE_THRESHOLD + 1);
    assert!(fired.is_some());
    assert_eq!(det.current_state(), DetectorState::Above);

    for _ in 0..2000 {
        assert!(det.on_sample(200).is_none());
    }
    assert_eq!(det.current_state(), DetectorState::Below);
    assert_eq!(det.event_count(), 1);
}

#[test]
fn threshold_is_exclusive() {
    let mut det = full_rate_detector();
    assert!(det.on_sample(AMPLITUDE_THRESHOLD).is_none());
    assert!(det.on_sample(AMPLITUDE_THRESHOLD + 1).is_some());
}

#[test]
fn event_counter_is_monotonic_across_distinct_events() {
    let mut det = AmplitudeDetector::new(
        &AmplitudeConfig {
            threshold: AMPLITUDE_THRESHOLD,
            cooldown_ms: 0,
        },
        WINDOW_SIZE_SAMPLES,
        1000,
    );
    let mut last_seq = 0;
    for _ in 0..5 {
        det.on_sample(100);
        let event = det.on_sample(6000).expect("re-armed edge fires");
        assert_eq!(event.seq, last_seq + 1);
        last_seq = event.seq;
    }
}

// ─── Engine seam ────────────────────────────────────────────────────

#[test]
fn engine_reports_its_requirements() {
    let det = full_rate_detector();
    assert_eq!(det.required_window_len(), WINDOW_SIZE_SAMPLES);
    assert_eq!(det.required_sample_rate(), SAMPLE_RATE_HZ);
}

#[test]
fn full_window_of_silence_produces_no_event() {
    let mut det = full_rate_detector();
    let window = vec![200i16; WINDOW_SIZE_SAMPLES];
    assert!(det.process(&window).unwrap().is_none());
    assert_eq!(det.current_state(), DetectorState::Below);
}

#[test]
fn one_bang_inside_a_full_window_is_surfaced() {
    let mut det = full_rate_detector();
    let mut window = vec![200i16; WINDOW_SIZE_SAMPLES];
    window[5000] = 9000;
    let event = det.process(&window).unwrap().expect("bang surfaces");
    assert_eq!(event.seq, 1);
    // 5001 samples at 16 kHz ≈ 312 ms into the stream.
    assert_eq!(event.timestamp_ms, 5001 * 1000 / SAMPLE_RATE_HZ as u64);
}

// ─── Probability gate ───────────────────────────────────────────────

#[test]
fn default_gate_uses_the_strict_070_boundary() {
    let gate = ProbabilityGate::new(warden_detect::DANGER_THRESHOLD);
    assert!(!gate.fires(0.70));
    assert!(gate.fires(0.71));
    assert!(!gate.fires(0.699));
}
