//! Sitzungs-Ereignisse
//!
//! Beschreibt, warum eine Streaming-Sitzung beendet wurde. Der erste Grund,
//! mit dem das Abbruchsignal ausgeloest wird, bleibt fuer den Rest des
//! Laufs gueltig.

use serde::{Deserialize, Serialize};

/// Grund fuer das Ende einer Streaming-Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopGrund {
    /// Server hat `stop` gesendet (VAD-Timeout)
    ServerStop,
    /// Audioquelle hat nicht das Format 16 kHz / Mono / 16 Bit
    FormatFehler,
    /// Audioquelle fehlt oder ist nicht lesbar
    QuelleFehlt,
    /// Verbindung zum Server wurde getrennt
    VerbindungGetrennt,
    /// Externe Unterbrechung (Ctrl-C)
    Unterbrechung,
}

impl StopGrund {
    /// Gibt true zurueck wenn die Sitzung regulaer beendet wurde
    pub fn ist_regulaer(&self) -> bool {
        matches!(self, Self::ServerStop | Self::Unterbrechung)
    }
}

impl std::fmt::Display for StopGrund {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::ServerStop => "Server hat STOP gesendet (VAD-Timeout)",
            Self::FormatFehler => "Audioformat ungueltig",
            Self::QuelleFehlt => "Audioquelle nicht gefunden",
            Self::VerbindungGetrennt => "Verbindung getrennt",
            Self::Unterbrechung => "Unterbrochen",
        };
        f.write_str(text)
    }
}
