use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Permit accounting for the fixed set of frame buffers. The control loop
/// is single-threaded, but the pool still enforces the acquire/release
/// discipline so a leaked buffer surfaces as exhaustion instead of silent
/// memory growth.
#[derive(Clone)]
pub struct FramePool {
    available: Arc<AtomicUsize>,
    fb_count: usize,
}

impl FramePool {
    pub fn new(fb_count: usize) -> Self {
        Self {
            available: Arc::new(AtomicUsize::new(fb_count)),
            fb_count,
        }
    }

    pub fn try_acquire(&self) -> Option<FramePermit> {
        let mut current = self.available.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return None;
            }
            match self.available.compare_exchange(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Some(FramePermit {
                        available: Arc::clone(&self.available),
                    })
                }
                Err(actual) => current = actual,
            }
        }
    }

    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    pub fn fb_count(&self) -> usize {
        self.fb_count
    }
}

pub struct FramePermit {
    available: Arc<AtomicUsize>,
}

impl Drop for FramePermit {
    fn drop(&mut self) {
        self.available.fetch_add(1, Ordering::AcqRel);
    }
}

/// One encoded still image. Owns its bytes and the frame permit that backs
/// them; dropping the buffer returns the permit to the pool.
pub struct ImageBuffer {
    data: Vec<u8>,
    _permit: FramePermit,
}

impl ImageBuffer {
    pub fn new(data: Vec<u8>, permit: FramePermit) -> Self {
        Self {
            data,
            _permit: permit,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
