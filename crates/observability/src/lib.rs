//! # boww-observability
//!
//! Structured Logging fuer den BoWW Test-Client via tracing-subscriber.
//! Text-Format fuer die Konsole, JSON-Format fuer automatisierte Testlaeufe.

pub mod logging;

pub use logging::{log_format_gueltig, log_level_gueltig, logging_initialisieren};
