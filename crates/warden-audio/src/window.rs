use crate::source::{is_invalid_sample, SampleSource};
use warden_foundation::AudioError;

/// Assembles fixed-length windows of valid samples for the classifier.
///
/// The backing buffer is owned here and reused across cycles; callers get a
/// borrowed slice that is valid until the next `fill`. Partially filled
/// windows are never handed out.
pub struct WindowBuilder {
    window_len: usize,
    buf: Vec<i16>,
    max_consecutive_invalid: Option<u64>,
    last_fill_discarded: u64,
}

impl WindowBuilder {
    pub fn new(window_len: usize) -> Self {
        Self {
            window_len,
            buf: Vec::with_capacity(window_len),
            max_consecutive_invalid: None,
            last_fill_discarded: 0,
        }
    }

    /// Opt-in liveness bound: fail with `AudioError::StuckSource` after this
    /// many consecutive invalid readings instead of blocking forever. With
    /// no bound the fill loops indefinitely on a stuck peripheral.
    pub fn with_invalid_bound(mut self, bound: u64) -> Self {
        self.max_consecutive_invalid = Some(bound);
        self
    }

    /// Pull samples until exactly `window_len` valid ones are collected.
    /// Sentinel invalid readings are discarded without advancing the fill
    /// index and do not count toward the window length.
    pub fn fill(&mut self, source: &mut dyn SampleSource) -> Result<&[i16], AudioError> {
        self.buf.clear();
        self.last_fill_discarded = 0;
        let mut consecutive_invalid = 0u64;

        while self.buf.len() < self.window_len {
            let sample = source.read()?;

            if is_invalid_sample(sample) {
                self.last_fill_discarded += 1;
                consecutive_invalid += 1;
                if let Some(bound) = self.max_consecutive_invalid {
                    if consecutive_invalid >= bound {
                        return Err(AudioError::StuckSource {
                            count: consecutive_invalid,
                        });
                    }
                }
                continue;
            }

            consecutive_invalid = 0;
            self.buf.push(sample);
        }

        Ok(&self.buf)
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Sentinel readings discarded during the most recent `fill`.
    pub fn last_fill_discarded(&self) -> u64 {
        self.last_fill_discarded
    }
}
