/// Sample rate the microphone and the sound model are configured for.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Model input length: one second of audio at the configured rate.
pub const WINDOW_SIZE_SAMPLES: usize = 16_000;

/// ML decision gate. Strictly greater-than: 0.70 exactly does not fire.
pub const DANGER_THRESHOLD: f32 = 0.70;

/// Absolute sample magnitude gate for the amplitude variant.
pub const AMPLITUDE_THRESHOLD: i16 = 4500;

/// Minimum spacing between amplitude detection events.
pub const EVENT_COOLDOWN_MS: u64 = 100;
