//! Stop-Listener
//!
//! Liest die Eingangsrichtung der Streaming-Verbindung und loest das
//! Abbruchsignal aus, sobald der Server `stop` sendet. Unlesbare oder
//! unbekannte Nachrichten werden verworfen; der Listener laeuft weiter.

use boww_core::StopGrund;
use boww_protocol::ControlMessage;
use futures_util::{Stream, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

use crate::cancel::Abbruchsignal;

/// Lauscht auf Steuerungsnachrichten bis zum Abbruch
///
/// Endet die Verbindung, wird das Signal mit `VerbindungGetrennt`
/// ausgeloest, damit der Streamer nicht unbegrenzt im Leerlauf wartet.
pub async fn lauschen<S>(mut eingang: S, abbruch: Abbruchsignal)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        let nachricht = tokio::select! {
            n = eingang.next() => n,
            _ = abbruch.abgewartet() => return,
        };

        let dekodiert = match nachricht {
            Some(Ok(Message::Text(text))) => ControlMessage::dekodieren(&text),
            Some(Ok(Message::Binary(daten))) => ControlMessage::dekodieren_bytes(&daten),
            Some(Ok(Message::Close(frame))) => {
                info!(frame = ?frame, "Server hat die Verbindung geschlossen");
                abbruch.ausloesen(StopGrund::VerbindungGetrennt);
                return;
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                warn!(fehler = %e, "Verbindung abgebrochen");
                abbruch.ausloesen(StopGrund::VerbindungGetrennt);
                return;
            }
            None => {
                info!("Verbindung beendet");
                abbruch.ausloesen(StopGrund::VerbindungGetrennt);
                return;
            }
        };

        match dekodiert {
            Ok(ControlMessage::Stop) => {
                info!("STOP vom Server empfangen (VAD-Timeout)");
                abbruch.ausloesen(StopGrund::ServerStop);
                return;
            }
            Ok(andere) => debug!(typ = andere.typ(), "Nachricht ignoriert"),
            // Unlesbares beendet die Sitzung nicht
            Err(e) => debug!(fehler = %e, "Unlesbare Nachricht verworfen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::time::Duration;

    type Eingang = Result<Message, tungstenite::Error>;

    fn text(s: &str) -> Eingang {
        Ok(Message::Text(s.to_string()))
    }

    #[tokio::test]
    async fn stop_loest_signal_aus() {
        let abbruch = Abbruchsignal::neu();
        let eingang = stream::iter(vec![text(r#"{"type":"stop"}"#)]).chain(stream::pending());

        lauschen(eingang, abbruch.clone()).await;
        assert_eq!(abbruch.grund(), Some(StopGrund::ServerStop));
    }

    #[tokio::test]
    async fn unlesbares_wird_ignoriert() {
        let abbruch = Abbruchsignal::neu();
        let eingang = stream::iter(vec![
            text("{\"type\":"),
            text("kein json"),
            text(r#"{"type":"volume","level":3}"#),
            Ok(Message::Binary(vec![0xff, 0x00])),
            Ok(Message::Ping(vec![1])),
            text(r#"{"type":"stop"}"#),
        ])
        .chain(stream::pending());

        lauschen(eingang, abbruch.clone()).await;
        assert_eq!(abbruch.grund(), Some(StopGrund::ServerStop));
    }

    #[tokio::test]
    async fn stop_als_binaerframe() {
        let abbruch = Abbruchsignal::neu();
        let eingang = stream::iter(vec![Ok(Message::Binary(br#"{"type":"stop"}"#.to_vec()))])
            .chain(stream::pending());

        lauschen(eingang, abbruch.clone()).await;
        assert_eq!(abbruch.grund(), Some(StopGrund::ServerStop));
    }

    #[tokio::test(start_paused = true)]
    async fn spaete_assign_id_ohne_wirkung() {
        let abbruch = Abbruchsignal::neu();
        let eingang = stream::iter(vec![
            text(r#"{"type":"assign_id","id":"neu"}"#),
            text(r#"{"type":"conf_rec"}"#),
        ])
        .chain(stream::pending());

        let aufgabe = tokio::spawn(lauschen(eingang, abbruch.clone()));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!abbruch.ist_ausgeloest());
        assert!(!aufgabe.is_finished());

        abbruch.ausloesen(StopGrund::Unterbrechung);
        aufgabe.await.unwrap();
        assert_eq!(abbruch.grund(), Some(StopGrund::Unterbrechung));
    }

    #[tokio::test]
    async fn close_meldet_getrennte_verbindung() {
        let abbruch = Abbruchsignal::neu();
        let eingang = stream::iter(vec![
            Ok(Message::Close(None)),
            text(r#"{"type":"stop"}"#),
        ]);

        lauschen(eingang, abbruch.clone()).await;
        assert_eq!(abbruch.grund(), Some(StopGrund::VerbindungGetrennt));
    }

    #[tokio::test]
    async fn stromende_meldet_getrennte_verbindung() {
        let abbruch = Abbruchsignal::neu();
        lauschen(stream::empty::<Eingang>(), abbruch.clone()).await;
        assert_eq!(abbruch.grund(), Some(StopGrund::VerbindungGetrennt));
    }

    #[tokio::test]
    async fn bereits_ausgeloest_endet_sofort() {
        let abbruch = Abbruchsignal::neu();
        abbruch.ausloesen(StopGrund::FormatFehler);
        lauschen(stream::pending::<Eingang>(), abbruch.clone()).await;
        assert_eq!(abbruch.grund(), Some(StopGrund::FormatFehler));
    }
}
