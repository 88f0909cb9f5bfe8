use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameSize {
    Qvga,
    Vga,
    Svga,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub frame_size: FrameSize,
    /// JPEG quality knob in the sensor's 0-63 convention (lower is finer).
    pub jpeg_quality: u8,
    /// Number of frame buffers the driver may hold at once.
    pub fb_count: usize,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frame_size: FrameSize::Qvga,
            jpeg_quality: 12,
            fb_count: 1,
        }
    }
}
