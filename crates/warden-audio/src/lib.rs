pub mod level;
#[cfg(feature = "mic")]
pub mod mic;
pub mod source;
pub mod wav;
pub mod window;

pub use source::{is_invalid_sample, SampleSource, ScriptedSource, INVALID_SAMPLE_MARKERS};
pub use wav::WavFileSource;
pub use window::WindowBuilder;
