pub mod config;
pub mod controller;
pub mod multipart;
pub mod transport;

pub use config::{AlertConfig, TransportConfig, DEFAULT_CAPTION};
pub use controller::{AlertController, CycleOutcome};
pub use multipart::PhotoForm;
pub use transport::{AlertTransport, TelegramNotifier, TransportError};
