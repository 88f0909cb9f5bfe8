use std::path::Path;

use crate::source::SampleSource;
use warden_foundation::AudioError;

/// File-backed sample source: a host-side stand-in for the I2S microphone,
/// useful for soak tests and offline probes. Multi-channel files are averaged
/// down to mono at load time.
pub struct WavFileSource {
    samples: Vec<i16>,
    pos: usize,
    loop_playback: bool,
    samples_read: u64,
}

impl WavFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let mut reader = hound::WavReader::open(&path)
            .map_err(|e| AudioError::InitFailed(format!("open wav: {e}")))?;
        let spec = reader.spec();

        let raw: Vec<i16> = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .samples::<i16>()
                .collect::<Result<_, _>>()
                .map_err(|e| AudioError::InitFailed(format!("decode wav: {e}")))?,
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
                .collect::<Result<_, _>>()
                .map_err(|e| AudioError::InitFailed(format!("decode wav: {e}")))?,
        };

        let channels = spec.channels as usize;
        let samples = if channels <= 1 {
            raw
        } else {
            raw.chunks_exact(channels)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                    (sum / channels as i32) as i16
                })
                .collect()
        };

        tracing::debug!(
            path = %path.as_ref().display(),
            sample_rate = spec.sample_rate,
            channels,
            samples = samples.len(),
            "Loaded WAV sample source"
        );

        Ok(Self {
            samples,
            pos: 0,
            loop_playback: false,
            samples_read: 0,
        })
    }

    /// Wrap around at end-of-file instead of reporting exhaustion.
    pub fn looping(mut self) -> Self {
        self.loop_playback = true;
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleSource for WavFileSource {
    fn read(&mut self) -> Result<i16, AudioError> {
        if self.pos >= self.samples.len() {
            if !self.loop_playback || self.samples.is_empty() {
                return Err(AudioError::Exhausted {
                    samples_read: self.samples_read,
                });
            }
            self.pos = 0;
        }
        let sample = self.samples[self.pos];
        self.pos += 1;
        self.samples_read += 1;
        Ok(sample)
    }
}
