//! Fehlertypen fuer den BoWW Test-Client
//!
//! Zentraler Fehler-Enum fuer crate-uebergreifende Fehlerzustaende.
//! Die Fachcrates definieren eigene Fehler und konvertieren via `#[from]`.

use thiserror::Error;

/// Globaler Result-Alias
pub type Result<T> = std::result::Result<T, BowwError>;

/// Alle crate-uebergreifenden Fehler
#[derive(Debug, Error)]
pub enum BowwError {
    #[error("Ungueltige Server-Adresse: {0}")]
    UngueltigeAdresse(String),

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),
}

impl BowwError {
    /// Erstellt einen Konfigurationsfehler aus einer beliebigen Nachricht
    pub fn konfiguration(msg: impl Into<String>) -> Self {
        Self::Konfiguration(msg.into())
    }
}
