//! boww-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die von allen anderen
//! Crates des BoWW Test-Clients gemeinsam genutzt werden.

pub mod error;
pub mod event;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{BowwError, Result};
pub use event::StopGrund;
pub use types::{ServiceRecord, SessionGuid};
