//! boww-protocol – Protokoll-Definitionen
//!
//! Dieses Crate definiert die Steuerungsnachrichten (JSON-Textframes) und
//! das Audio-Frame-Format (binaere PCM-Frames), die zwischen Test-Client
//! und BoWW-Server ausgetauscht werden.

pub mod audio;
pub mod control;

pub use audio::{AudioFormat, AudioFrame, FRAME_SAMPLES, FRAME_BYTES};
pub use control::{ControlMessage, DekodierFehler};
