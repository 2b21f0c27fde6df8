//! boww-audio – Audioquelle des Test-Clients
//!
//! Liest eine vorab aufgenommene WAV-Datei:
//! - strikte Formatpruefung (16 kHz, Mono, 16 Bit Integer)
//! - sequentielles Lesen in Frames zu 1024 Samples

pub mod error;
pub mod source;

pub use error::{AudioError, AudioResult};
pub use source::WavQuelle;
