use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::source::SampleSource;
use warden_foundation::AudioError;

const CHANNEL_CAPACITY: usize = 32_768;

/// Live microphone source backed by cpal.
///
/// The stream object is not `Send`, so it lives on a dedicated capture
/// thread (spawned here) that pushes mono samples into a bounded channel;
/// `read` blocks on the consuming side. There is no shutdown path: the
/// sentinel runs until power-off.
pub struct MicSource {
    rx: Receiver<i16>,
}

impl MicSource {
    pub fn open() -> Result<Self, AudioError> {
        let (tx, rx) = crossbeam_channel::bounded::<i16>(CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), AudioError>>(1);

        std::thread::Builder::new()
            .name("mic-capture".to_string())
            .spawn(move || capture_thread(tx, ready_tx))
            .map_err(|e| AudioError::InitFailed(format!("spawn capture thread: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| AudioError::InitFailed("capture thread died during setup".into()))??;

        Ok(Self { rx })
    }
}

impl SampleSource for MicSource {
    fn read(&mut self) -> Result<i16, AudioError> {
        self.rx.recv().map_err(|_| AudioError::Disconnected)
    }
}

fn capture_thread(tx: Sender<i16>, ready_tx: Sender<Result<(), AudioError>>) {
    let host = cpal::default_host();
    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            let _ = ready_tx.send(Err(AudioError::InitFailed(
                "no default input device".into(),
            )));
            return;
        }
    };
    let supported = match device.default_input_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = ready_tx.send(Err(AudioError::InitFailed(e.to_string())));
            return;
        }
    };
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels as usize;

    let device_name = device.name().unwrap_or_default();
    tracing::info!(
        device = %device_name,
        sample_rate = config.sample_rate.0,
        channels,
        "Microphone capture starting"
    );

    let build = match sample_format {
        cpal::SampleFormat::I16 => {
            let tx = tx.clone();
            device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    for frame in data.chunks(channels) {
                        push_sample(&tx, frame[0]);
                    }
                },
                |e| tracing::error!("Mic stream error: {}", e),
                None,
            )
        }
        cpal::SampleFormat::F32 => {
            let tx = tx.clone();
            device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    for frame in data.chunks(channels) {
                        let s = (frame[0].clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                        push_sample(&tx, s);
                    }
                },
                |e| tracing::error!("Mic stream error: {}", e),
                None,
            )
        }
        other => {
            let _ = ready_tx.send(Err(AudioError::InitFailed(format!(
                "unsupported sample format {other:?}"
            ))));
            return;
        }
    };

    let stream = match build {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(AudioError::InitFailed(e.to_string())));
            return;
        }
    };
    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(AudioError::InitFailed(e.to_string())));
        return;
    }
    let _ = ready_tx.send(Ok(()));

    // Keep the stream alive for the lifetime of the process.
    loop {
        std::thread::sleep(std::time::Duration::from_secs(3600));
    }
}

fn push_sample(tx: &Sender<i16>, sample: i16) {
    // The control loop spends seconds inside inference and transport calls;
    // shedding readings is preferable to blocking the audio callback.
    if let Err(TrySendError::Full(_)) = tx.try_send(sample) {
        // Consumer is behind; drop this reading.
    }
}
