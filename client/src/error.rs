//! Fehlertypen des Test-Clients
//!
//! Jeder Fehler beendet den Lauf; es gibt keine automatischen
//! Wiederholungen (Ausnahme: die explizit konfigurierte Onboarding-Politik).

use std::time::Duration;

use boww_core::BowwError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Alle Fehler, die einen Lauf des Test-Clients beenden koennen
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("BoWW-Server nicht per mDNS gefunden (Zeitlimit {0:?})")]
    DiscoveryTimeout(Duration),

    #[error("mDNS-Fehler: {0}")]
    Mdns(#[from] mdns_sd::Error),

    #[error("Onboarding-Verbindung nach {versuche} Versuch(en) ohne ID-Zuweisung geschlossen")]
    OnboardingAbgebrochen { versuche: u32 },

    #[error("Verbindung getrennt: {0}")]
    VerbindungGetrennt(String),

    #[error("WebSocket-Fehler: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Nachricht nicht serialisierbar: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] BowwError),

    #[error("Lauf unterbrochen")]
    Unterbrochen,
}

impl ClientError {
    /// Gibt true zurueck wenn der Fehler eine getrennte Verbindung ist
    pub fn ist_verbindungsfehler(&self) -> bool {
        match self {
            Self::VerbindungGetrennt(_) | Self::WebSocket(_) => true,
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
