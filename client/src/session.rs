//! Streaming-Sitzung
//!
//! Startet Streamer und Stop-Listener als Geschwister-Tasks auf derselben
//! Verbindung. Beide teilen ein `Abbruchsignal`; sobald es ausgeloest ist,
//! werden beide Tasks beendet und eingesammelt, bevor die Verbindung
//! geschlossen wird. Kein Task ueberlebt die Sitzung.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use boww_core::StopGrund;
use futures_util::Stream;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::cancel::Abbruchsignal;
use crate::listener::lauschen;
use crate::streamer::{AudioSenke, AudioStreamer};

/// Ergebnis einer beendeten Sitzung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SitzungsBericht {
    /// Grund, mit dem die Sitzung beendet wurde
    pub grund: StopGrund,
    /// Anzahl erfolgreich gesendeter Audio-Frames
    pub gesendete_frames: u64,
}

/// Koordiniert eine Streaming-Sitzung
pub struct Sitzung {
    streamer: AudioStreamer,
}

impl Sitzung {
    pub fn neu(streamer: AudioStreamer) -> Self {
        Self { streamer }
    }

    /// Fuehrt die Sitzung bis zum Abbruch aus
    ///
    /// `senke` und `eingang` sind die beiden Richtungen derselben
    /// Verbindung. Die Senke wird am Ende geschlossen, nachdem beide Tasks
    /// beendet sind.
    pub async fn ausfuehren<K, S>(
        self,
        senke: K,
        eingang: S,
        abbruch: Abbruchsignal,
    ) -> SitzungsBericht
    where
        K: AudioSenke + 'static,
        S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin + Send + 'static,
    {
        let senke = Arc::new(Mutex::new(senke));
        let gesendet = Arc::new(AtomicU64::new(0));

        let mut tasks = JoinSet::new();
        tasks.spawn(self.streamer.streamen(
            Arc::clone(&senke),
            abbruch.clone(),
            Arc::clone(&gesendet),
        ));
        tasks.spawn(lauschen(eingang, abbruch.clone()));
        debug!("Streamer und Stop-Listener gestartet");

        let grund = abbruch.abgewartet().await;
        info!(grund = %grund, "Sitzung wird beendet");

        // Beide Tasks sehen das Signal selbst; abort_all greift nur, falls
        // einer gerade in einem Sendevorgang haengt
        tasks.abort_all();
        while let Some(ergebnis) = tasks.join_next().await {
            if let Err(e) = ergebnis {
                if e.is_panic() {
                    warn!(fehler = %e, "Sitzungs-Task ist abgestuerzt");
                }
            }
        }

        if let Err(e) = senke.lock().await.schliessen().await {
            debug!(fehler = %e, "Verbindung nicht sauber geschlossen");
        }

        SitzungsBericht {
            grund,
            gesendete_frames: gesendet.load(Ordering::SeqCst),
        }
    }
}
