use std::path::PathBuf;

use crate::config::CameraConfig;
use crate::frame::{FramePool, ImageBuffer};
use crate::{CameraError, ImageSource};

/// File-backed camera: each capture re-reads an encoded JPEG from disk.
/// Stands in for the sensor on development hosts while exercising the same
/// frame-pool discipline as a real driver.
pub struct FileImageSource {
    path: PathBuf,
    pool: FramePool,
}

impl FileImageSource {
    pub fn new<P: Into<PathBuf>>(path: P, config: &CameraConfig) -> Result<Self, CameraError> {
        let path = path.into();
        if !path.is_file() {
            return Err(CameraError::InitFailed(format!(
                "image file not found: {}",
                path.display()
            )));
        }
        tracing::info!(
            path = %path.display(),
            frame_size = ?config.frame_size,
            fb_count = config.fb_count,
            "File-backed camera ready"
        );
        Ok(Self {
            path,
            pool: FramePool::new(config.fb_count),
        })
    }

    pub fn pool(&self) -> &FramePool {
        &self.pool
    }
}

impl ImageSource for FileImageSource {
    fn acquire(&mut self) -> Result<ImageBuffer, CameraError> {
        let permit = self.pool.try_acquire().ok_or(CameraError::PoolExhausted {
            fb_count: self.pool.fb_count(),
        })?;
        // Permit is dropped (returned) if the read fails.
        let data = std::fs::read(&self.path)
            .map_err(|e| CameraError::CaptureFailed(e.to_string()))?;
        Ok(ImageBuffer::new(data, permit))
    }
}
