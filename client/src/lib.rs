//! boww-client – Bibliotheks-Root
//!
//! Deklariert alle Client-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod cancel;
pub mod config;
pub mod discovery;
pub mod error;
pub mod handshake;
pub mod listener;
pub mod session;
pub mod streamer;

use std::future::Future;

use futures_util::StreamExt;
use tracing::info;

use cancel::Abbruchsignal;
use config::ClientConfig;
use error::{ClientError, ClientResult};
use session::{Sitzung, SitzungsBericht};
use streamer::{AudioStreamer, WsSenke};

/// Ein Lauf des Test-Clients
pub struct Client {
    pub config: ClientConfig,
    abbruch: Abbruchsignal,
}

impl Client {
    /// Erstellt einen neuen Client aus der gegebenen Konfiguration
    pub fn neu(config: ClientConfig) -> Self {
        Self {
            config,
            abbruch: Abbruchsignal::neu(),
        }
    }

    /// Signal, ueber das der Lauf von aussen beendet werden kann (Ctrl-C)
    pub fn abbruchsignal(&self) -> Abbruchsignal {
        self.abbruch.clone()
    }

    /// Fuehrt einen kompletten Lauf aus
    ///
    /// Reihenfolge:
    /// 1. Server per mDNS finden
    /// 2. Identitaet auf der Onboarding-Verbindung abholen
    /// 3. Streaming-Verbindung aufbauen und anmelden
    /// 4. Audio streamen bis Server-Stop, Fehler oder Unterbrechung
    ///
    /// Fehler vor Beginn des Streamings beenden den Lauf mit `Err`. Ab dem
    /// Streaming endet er immer mit einem `SitzungsBericht`.
    pub async fn starten(self) -> ClientResult<SitzungsBericht> {
        info!(datei = %self.config.audio.datei.display(), "BoWW Test-Client startet");

        let record = self
            .unterbrechbar(discovery::entdecken(&self.config.discovery))
            .await?;

        let guid = self
            .unterbrechbar(handshake::identitaet_abholen(
                record,
                &self.config.verbindung,
            ))
            .await?;

        let ws = self
            .unterbrechbar(handshake::streaming_verbindung(
                record,
                &guid,
                self.config.audio.confidence,
            ))
            .await?;

        info!("Starte Audio-Stream...");
        let (schreiber, leser) = ws.split();
        let sitzung = Sitzung::neu(AudioStreamer::neu(&self.config.audio));
        let bericht = sitzung
            .ausfuehren(WsSenke(schreiber), leser, self.abbruch.clone())
            .await;

        info!(
            grund = %bericht.grund,
            frames = bericht.gesendete_frames,
            "Session beendet"
        );
        Ok(bericht)
    }

    /// Bricht eine Vorbereitungsphase ab, sobald das Signal ausgeloest ist
    async fn unterbrechbar<T>(
        &self,
        phase: impl Future<Output = ClientResult<T>>,
    ) -> ClientResult<T> {
        tokio::select! {
            ergebnis = phase => ergebnis,
            _ = self.abbruch.abgewartet() => Err(ClientError::Unterbrochen),
        }
    }
}
