//! Verbindungsaufbau und Identitaets-Handshake
//!
//! Zwei aufeinanderfolgende WebSocket-Verbindungen zum selben Endpunkt:
//!
//! ```text
//! Verbindung 1 (anonym)       Verbindung 2 (mit Identitaet)
//! ---------------------       -----------------------------
//! <- ... (ignoriert)          -> {type: hello, guid}
//! <- {type: assign_id, id}    -> {type: confidence, value}
//! schliessen                  <- Bestaetigung (opak)
//!                             => Streaming darf beginnen
//! ```
//!
//! Die Reihenfolge ist Teil des Protokolls: der Server ordnet die zweite
//! Verbindung erst nach `hello` einer Sitzung zu.

use boww_core::{ServiceRecord, SessionGuid};
use boww_protocol::ControlMessage;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::VerbindungsEinstellungen;
use crate::error::{ClientError, ClientResult};

/// WebSocket-Verbindung zum Server
pub type WsVerbindung = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ---------------------------------------------------------------------------
// Phase 1: Onboarding
// ---------------------------------------------------------------------------

/// Holt die Sitzungs-Identitaet ueber die anonyme Onboarding-Verbindung
///
/// Endet die Verbindung vor `assign_id`, entscheidet die konfigurierte
/// `OnboardingPolitik` ueber einen neuen Versuch.
pub async fn identitaet_abholen(
    record: ServiceRecord,
    einst: &VerbindungsEinstellungen,
) -> ClientResult<SessionGuid> {
    let uri = record.ws_uri();
    let max_versuche = einst.max_versuche();

    for versuch in 1..=max_versuche {
        info!(uri = %uri, versuch, "Verbinde (Onboarding)...");
        let (mut ws, _) = connect_async(uri.as_str()).await?;
        info!("Verbunden, warte auf ID-Zuweisung");

        let guid = id_empfangen(&mut ws).await;

        // Verbindung 1 wird nach der Zuweisung nicht mehr gebraucht
        if let Err(e) = ws.close(None).await {
            debug!(fehler = %e, "Onboarding-Verbindung nicht sauber geschlossen");
        }

        if let Some(guid) = guid {
            info!(guid = %guid, "Autorisiert, GUID zugewiesen");
            return Ok(guid);
        }

        warn!(
            versuch,
            max_versuche, "Onboarding-Verbindung ohne ID-Zuweisung geschlossen"
        );
        if versuch < max_versuche {
            tokio::time::sleep(einst.onboarding_pause()).await;
        }
    }

    Err(ClientError::OnboardingAbgebrochen {
        versuche: max_versuche,
    })
}

/// Liest Nachrichten bis zur ersten `assign_id`
///
/// Andere Nachrichten und nicht dekodierbare Frames werden uebersprungen.
/// Gibt `None` zurueck wenn die Verbindung vorher endet.
pub async fn id_empfangen<S>(eingang: &mut S) -> Option<SessionGuid>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(nachricht) = eingang.next().await {
        let text = match nachricht {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => return None,
            Ok(_) => continue,
            Err(e) => {
                debug!(fehler = %e, "Onboarding-Verbindung abgebrochen");
                return None;
            }
        };

        match ControlMessage::dekodieren(&text) {
            Ok(ControlMessage::AssignId { id }) => return Some(SessionGuid::new(id)),
            Ok(andere) => debug!(typ = andere.typ(), "Nachricht vor assign_id ignoriert"),
            Err(_) => debug!("Unlesbare Nachricht vor assign_id ignoriert"),
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Phase 2: Streaming-Verbindung
// ---------------------------------------------------------------------------

/// Baut die Streaming-Verbindung auf und meldet sich mit der Identitaet an
///
/// Kehrt erst nach der Bestaetigung des Servers zurueck.
pub async fn streaming_verbindung(
    record: ServiceRecord,
    guid: &SessionGuid,
    confidence: f32,
) -> ClientResult<WsVerbindung> {
    let uri = record.ws_uri();
    info!(uri = %uri, guid = %guid, "Verbinde erneut mit Identitaet...");
    let (mut ws, _) = connect_async(uri.as_str()).await?;

    let bestaetigung = anmelden(&mut ws, guid, confidence).await?;
    info!(antwort = %bestaetigung, "Server-Bestaetigung erhalten");

    Ok(ws)
}

/// Sendet `hello` und `confidence` und wartet auf genau eine Antwort
///
/// Die Antwort wird nicht ausgewertet. Ping/Pong-Frames zaehlen nicht als
/// Antwort.
pub async fn anmelden<W>(ws: &mut W, guid: &SessionGuid, confidence: f32) -> ClientResult<Message>
where
    W: Sink<Message, Error = tungstenite::Error>
        + Stream<Item = Result<Message, tungstenite::Error>>
        + Unpin,
{
    ws.send(Message::Text(ControlMessage::hello(guid).kodieren()?))
        .await?;

    info!(confidence, "Sende Confidence");
    ws.send(Message::Text(ControlMessage::confidence(confidence).kodieren()?))
        .await?;

    loop {
        match ws.next().await {
            Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
            Some(Ok(Message::Close(frame))) => {
                return Err(ClientError::VerbindungGetrennt(format!(
                    "Server hat waehrend des Handshakes geschlossen: {frame:?}"
                )));
            }
            Some(Ok(antwort)) => return Ok(antwort),
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(ClientError::VerbindungGetrennt(
                    "Verbindung vor der Bestaetigung beendet".into(),
                ));
            }
        }
    }
}
