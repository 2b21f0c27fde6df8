//! Control-Protokoll (WebSocket-Textframes)
//!
//! Definiert alle Steuerungsnachrichten zwischen Client und Server.
//!
//! ## Design
//! - JSON-Serialisierung via serde, Feld `type` unterscheidet die Nachricht
//! - Tagged Enum fuer typsichere Nachrichtentypen
//! - Dekodieren liefert ein explizites `Result`; ob ein Fehler verworfen
//!   wird, entscheidet der Aufrufer
//!
//! ## Nachrichtenfluss
//! ```text
//! Verbindung 1:  Server -> {type: assign_id, id}
//! Verbindung 2:  Client -> {type: hello, guid}
//!                Client -> {type: confidence, value}
//!                Server -> {type: conf_rec}            (Bestaetigung)
//!                Client -> Binaerframes (PCM)
//!                Server -> {type: stop}                (VAD-Timeout)
//! ```

use boww_core::SessionGuid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fehler beim Dekodieren einer eingehenden Nachricht
#[derive(Debug, Error)]
pub enum DekodierFehler {
    #[error("Ungueltiges JSON oder unbekannter Nachrichtentyp: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Nachricht ist kein UTF-8-Text")]
    KeinText,
}

/// Alle bekannten Steuerungsnachrichten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Server vergibt beim Onboarding die Sitzungs-Identitaet
    AssignId { id: String },
    /// Client meldet sich auf Verbindung 2 mit seiner Identitaet
    Hello { guid: String },
    /// Client meldet die Wake-Word-Konfidenz (0.0 – 1.0)
    Confidence { value: f32 },
    /// Server beendet die Sitzung (VAD-Timeout)
    Stop,
    /// Server bestaetigt die Konfidenz
    #[serde(rename = "conf_rec", alias = "ack")]
    Ack,
}

impl ControlMessage {
    /// Erstellt die `hello`-Nachricht fuer die gegebene Identitaet
    pub fn hello(guid: &SessionGuid) -> Self {
        Self::Hello {
            guid: guid.as_str().to_string(),
        }
    }

    /// Erstellt die `confidence`-Nachricht
    pub fn confidence(value: f32) -> Self {
        Self::Confidence { value }
    }

    /// Dekodiert einen Textframe
    pub fn dekodieren(text: &str) -> Result<Self, DekodierFehler> {
        Ok(serde_json::from_str(text)?)
    }

    /// Dekodiert einen Binaerframe, der JSON enthaelt
    pub fn dekodieren_bytes(daten: &[u8]) -> Result<Self, DekodierFehler> {
        let text = std::str::from_utf8(daten).map_err(|_| DekodierFehler::KeinText)?;
        Self::dekodieren(text)
    }

    /// Serialisiert die Nachricht als JSON-Text
    pub fn kodieren(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Name des Nachrichtentyps (fuer Logs)
    pub fn typ(&self) -> &'static str {
        match self {
            Self::AssignId { .. } => "assign_id",
            Self::Hello { .. } => "hello",
            Self::Confidence { .. } => "confidence",
            Self::Stop => "stop",
            Self::Ack => "conf_rec",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_id_dekodieren() {
        let msg = ControlMessage::dekodieren(r#"{"type":"assign_id","id":"guid-42"}"#).unwrap();
        assert_eq!(
            msg,
            ControlMessage::AssignId {
                id: "guid-42".into()
            }
        );
    }

    #[test]
    fn stop_mit_zusatzfeldern() {
        let msg = ControlMessage::dekodieren(r#"{"type":"stop","reason":"vad"}"#).unwrap();
        assert_eq!(msg, ControlMessage::Stop);
    }

    #[test]
    fn bestaetigung_beide_namen() {
        assert_eq!(
            ControlMessage::dekodieren(r#"{"type":"conf_rec"}"#).unwrap(),
            ControlMessage::Ack
        );
        assert_eq!(
            ControlMessage::dekodieren(r#"{"type":"ack"}"#).unwrap(),
            ControlMessage::Ack
        );
    }

    #[test]
    fn unbekannter_typ_ist_fehler() {
        let err = ControlMessage::dekodieren(r#"{"type":"volume","level":3}"#).unwrap_err();
        assert!(matches!(err, DekodierFehler::Json(_)));
    }

    #[test]
    fn kaputtes_json_ist_fehler() {
        assert!(ControlMessage::dekodieren("{\"type\":").is_err());
        assert!(ControlMessage::dekodieren("kein json").is_err());
        // assign_id ohne id
        assert!(ControlMessage::dekodieren(r#"{"type":"assign_id"}"#).is_err());
    }

    #[test]
    fn binaerframe_ohne_utf8() {
        let err = ControlMessage::dekodieren_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, DekodierFehler::KeinText));
    }

    #[test]
    fn binaerframe_mit_json() {
        let msg = ControlMessage::dekodieren_bytes(br#"{"type":"stop"}"#).unwrap();
        assert_eq!(msg, ControlMessage::Stop);
    }

    #[test]
    fn hello_und_confidence_kodieren() {
        let guid = SessionGuid::new("abc");
        let hello: serde_json::Value =
            serde_json::from_str(&ControlMessage::hello(&guid).kodieren().unwrap()).unwrap();
        assert_eq!(hello["type"], "hello");
        assert_eq!(hello["guid"], "abc");

        let conf: serde_json::Value =
            serde_json::from_str(&ControlMessage::confidence(1.0).kodieren().unwrap()).unwrap();
        assert_eq!(conf["type"], "confidence");
        assert_eq!(conf["value"], 1.0);
    }

    #[test]
    fn typ_namen() {
        assert_eq!(ControlMessage::Stop.typ(), "stop");
        assert_eq!(ControlMessage::Ack.typ(), "conf_rec");
    }
}
