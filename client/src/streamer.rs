//! Audio-Streamer
//!
//! Liest die WAV-Quelle Frame fuer Frame und sendet jeden Frame als
//! Binaernachricht in Echtzeit: Frame `n` geht fruehestens zum Zeitpunkt
//! `start + (n + 1) * intervall` raus (1024 / 16000 s = 64 ms pro Frame) und
//! nie weniger als ein Intervall nach dem vorigen Frame. Haengt ein
//! Sendevorgang, verschiebt sich der Takt, statt Frames nachzuholen.
//!
//! Am Ende der Quelle bleibt die Verbindung offen. Der Streamer wartet im
//! Leerlauf, bis der Server nach erkannter Stille `stop` sendet oder die
//! Sitzung anderweitig beendet wird.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use boww_audio::WavQuelle;
use boww_core::StopGrund;
use boww_protocol::AudioFrame;
use futures_util::{Sink, SinkExt};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, warn};

use crate::cancel::Abbruchsignal;
use crate::config::AudioEinstellungen;
use crate::error::ClientResult;

// ---------------------------------------------------------------------------
// AudioSenke
// ---------------------------------------------------------------------------

/// Ziel fuer ausgehende Audio-Frames
///
/// Nach dem Handshake ist der Streamer der einzige Schreiber.
#[async_trait]
pub trait AudioSenke: Send {
    /// Sendet einen Frame
    async fn frame_senden(&mut self, frame: AudioFrame) -> ClientResult<()>;

    /// Gibt die Verbindung frei
    async fn schliessen(&mut self) -> ClientResult<()>;
}

/// WebSocket-Schreibhaelfte als Audio-Senke
pub struct WsSenke<S>(pub S);

#[async_trait]
impl<S> AudioSenke for WsSenke<S>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin + Send,
{
    async fn frame_senden(&mut self, frame: AudioFrame) -> ClientResult<()> {
        self.0.send(Message::Binary(frame.into_nutzdaten())).await?;
        Ok(())
    }

    async fn schliessen(&mut self) -> ClientResult<()> {
        self.0.close().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AudioStreamer
// ---------------------------------------------------------------------------

/// Sendet die Audioquelle in Echtzeit
#[derive(Debug, Clone)]
pub struct AudioStreamer {
    datei: PathBuf,
    fortschritt_alle: u64,
    leerlauf_poll: Duration,
}

impl AudioStreamer {
    pub fn neu(einst: &AudioEinstellungen) -> Self {
        Self {
            datei: einst.datei.clone(),
            fortschritt_alle: einst.fortschritt_alle,
            leerlauf_poll: einst.leerlauf_poll(),
        }
    }

    /// Streamt die Quelle bis zum Abbruchsignal
    ///
    /// Ist die Quelle nicht lesbar oder hat sie das falsche Format, wird das
    /// Signal sofort ausgeloest und kein Frame gesendet. `gesendet` zaehlt
    /// die erfolgreich gesendeten Frames mit.
    pub async fn streamen<K>(
        self,
        senke: Arc<Mutex<K>>,
        abbruch: Abbruchsignal,
        gesendet: Arc<AtomicU64>,
    ) where
        K: AudioSenke + ?Sized,
    {
        let mut quelle = match WavQuelle::oeffnen(&self.datei) {
            Ok(quelle) => quelle,
            Err(e) => {
                error!(datei = %self.datei.display(), fehler = %e, "Audioquelle unbrauchbar");
                let grund = if e.ist_formatfehler() {
                    StopGrund::FormatFehler
                } else {
                    StopGrund::QuelleFehlt
                };
                abbruch.ausloesen(grund);
                return;
            }
        };

        let intervall = quelle.format().frame_intervall();
        info!(
            datei = %self.datei.display(),
            frames = quelle.frame_anzahl(),
            intervall_ms = intervall.as_millis() as u64,
            "Streaming gestartet"
        );

        let start = Instant::now();
        let mut naechster_termin = start;
        let mut letzter_versand: Option<Instant> = None;

        loop {
            if abbruch.ist_ausgeloest() {
                return;
            }

            let frame = match quelle.naechster_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    error!(fehler = %e, "Audioquelle nicht lesbar");
                    abbruch.ausloesen(StopGrund::QuelleFehlt);
                    return;
                }
            };

            // Echtzeit-Takt: Termin folgt der Abspielzeit, liegt aber nie
            // weniger als ein Intervall hinter dem letzten Versand
            naechster_termin += intervall;
            if let Some(letzter) = letzter_versand {
                naechster_termin = naechster_termin.max(letzter + intervall);
            }
            tokio::select! {
                _ = tokio::time::sleep_until(naechster_termin) => {}
                _ = abbruch.abgewartet() => return,
            }
            if abbruch.ist_ausgeloest() {
                return;
            }

            let index = frame.index;
            if let Err(e) = senke.lock().await.frame_senden(frame).await {
                warn!(frame = index, fehler = %e, "Frame konnte nicht gesendet werden");
                abbruch.ausloesen(StopGrund::VerbindungGetrennt);
                return;
            }
            letzter_versand = Some(Instant::now());

            let anzahl = gesendet.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fortschritt_alle > 0 && anzahl % self.fortschritt_alle == 0 {
                fortschritt_anzeigen();
            }
        }

        info!(
            frames = gesendet.load(Ordering::SeqCst),
            dauer_ms = start.elapsed().as_millis() as u64,
            "Ende der Datei erreicht, warte auf Server-VAD..."
        );

        // Verbindung offen halten, damit der Server STOP senden kann
        while !abbruch.ist_ausgeloest() {
            tokio::time::sleep(self.leerlauf_poll).await;
        }
        debug!("Leerlauf beendet");
    }
}

/// Kosmetische Fortschrittsmarke auf stdout (kein Protokollbestandteil)
fn fortschritt_anzeigen() {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(b".").and_then(|_| stdout.flush()) {
        debug!(fehler = %e, "Fortschrittsmarke nicht geschrieben");
    }
}
