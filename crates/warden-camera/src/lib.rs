pub mod config;
pub mod file;
pub mod frame;

pub use config::{CameraConfig, FrameSize};
pub use file::FileImageSource;
pub use frame::{FramePool, ImageBuffer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera failed to initialize: {0}")]
    InitFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No free frame buffer ({fb_count} in pool)")]
    PoolExhausted { fb_count: usize },
}

/// On-demand still capture. One encoded image per call, checked out of the
/// fixed frame-buffer pool; the buffer returns its permit when dropped, so
/// release happens exactly once on every exit path.
pub trait ImageSource: Send {
    fn acquire(&mut self) -> Result<ImageBuffer, CameraError>;
}

impl ImageSource for Box<dyn ImageSource> {
    fn acquire(&mut self) -> Result<ImageBuffer, CameraError> {
        (**self).acquire()
    }
}
