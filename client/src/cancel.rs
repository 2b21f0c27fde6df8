//! Abbruchsignal der Streaming-Sitzung
//!
//! Ein geteiltes, einmal setzbares Signal. Beide Tasks der Sitzung erhalten
//! beim Start einen Klon; wer es zuerst ausloest, bestimmt den `StopGrund`.
//! Einmal ausgeloest bleibt es ausgeloest.

use std::sync::{Arc, OnceLock};

use boww_core::StopGrund;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Inner {
    grund: OnceLock<StopGrund>,
    token: CancellationToken,
}

/// Geteiltes Abbruchsignal (Klone teilen denselben Zustand)
#[derive(Debug, Clone, Default)]
pub struct Abbruchsignal {
    inner: Arc<Inner>,
}

impl Abbruchsignal {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Loest das Signal aus (Test-and-Set)
    ///
    /// Gibt true zurueck wenn dieser Aufruf das Signal gesetzt hat. Spaetere
    /// Aufrufe aendern den Grund nicht mehr.
    pub fn ausloesen(&self, grund: StopGrund) -> bool {
        // Grund vor dem Token setzen, damit Wartende ihn immer vorfinden
        let erster = self.inner.grund.set(grund).is_ok();
        self.inner.token.cancel();
        if erster {
            tracing::debug!(grund = ?grund, "Abbruchsignal ausgeloest");
        }
        erster
    }

    /// Nicht-blockierende Abfrage
    pub fn ist_ausgeloest(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Grund, mit dem das Signal zuerst ausgeloest wurde
    pub fn grund(&self) -> Option<StopGrund> {
        self.inner.grund.get().copied()
    }

    /// Wartet bis das Signal ausgeloest ist und gibt den Grund zurueck
    pub async fn abgewartet(&self) -> StopGrund {
        self.inner.token.cancelled().await;
        self.grund().unwrap_or(StopGrund::Unterbrechung)
    }
}
