//! Client-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Client ohne Konfigurationsdatei
//! lauffaehig ist.

use std::path::PathBuf;
use std::time::Duration;

use boww_core::BowwError;
use serde::{Deserialize, Serialize};

/// Vollstaendige Client-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Dienstsuche (mDNS)
    pub discovery: DiscoveryEinstellungen,
    /// Verbindungsaufbau und Handshake
    pub verbindung: VerbindungsEinstellungen,
    /// Audioquelle und Streaming
    pub audio: AudioEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Dienstsuche per mDNS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryEinstellungen {
    /// mDNS-Diensttyp des Servers
    pub service_typ: String,
    /// Maximale Wartezeit auf den ersten Server in Millisekunden
    pub timeout_ms: u64,
    /// Feste Server-Adresse `"a.b.c.d:port"`, ueberspringt die mDNS-Suche
    pub server: Option<String>,
}

impl Default for DiscoveryEinstellungen {
    fn default() -> Self {
        Self {
            service_typ: "_boww._tcp.local.".into(),
            timeout_ms: 5_000,
            server: None,
        }
    }
}

impl DiscoveryEinstellungen {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Verhalten wenn die Onboarding-Verbindung endet, bevor der Server eine
/// ID zugewiesen hat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingPolitik {
    /// Lauf sofort mit Fehler beenden
    #[default]
    Abbrechen,
    /// Onboarding-Verbindung neu aufbauen (begrenzte Anzahl Versuche)
    ErneutVerbinden,
}

/// Verbindungsaufbau und Handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbindungsEinstellungen {
    /// Politik fuer eine vorzeitig geschlossene Onboarding-Verbindung
    pub onboarding_abbruch: OnboardingPolitik,
    /// Maximale Anzahl Onboarding-Versuche (nur bei `erneut_verbinden`)
    pub onboarding_versuche: u32,
    /// Pause zwischen zwei Onboarding-Versuchen in Millisekunden
    pub onboarding_pause_ms: u64,
}

impl Default for VerbindungsEinstellungen {
    fn default() -> Self {
        Self {
            onboarding_abbruch: OnboardingPolitik::Abbrechen,
            onboarding_versuche: 3,
            onboarding_pause_ms: 1_000,
        }
    }
}

impl VerbindungsEinstellungen {
    /// Anzahl der erlaubten Onboarding-Verbindungen insgesamt
    pub fn max_versuche(&self) -> u32 {
        match self.onboarding_abbruch {
            OnboardingPolitik::Abbrechen => 1,
            OnboardingPolitik::ErneutVerbinden => self.onboarding_versuche,
        }
    }

    pub fn onboarding_pause(&self) -> Duration {
        Duration::from_millis(self.onboarding_pause_ms)
    }
}

/// Audioquelle und Streaming
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioEinstellungen {
    /// WAV-Datei (16 kHz, Mono, 16 Bit)
    pub datei: PathBuf,
    /// Konfidenzwert der `confidence`-Nachricht (0.0 bis 1.0)
    pub confidence: f32,
    /// Fortschrittsmarke alle N Frames (0 = aus)
    pub fortschritt_alle: u64,
    /// Abfrageintervall waehrend des Wartens auf den Server-Stop in ms
    pub leerlauf_poll_ms: u64,
}

impl Default for AudioEinstellungen {
    fn default() -> Self {
        Self {
            datei: PathBuf::from("jfk-sil.wav"),
            confidence: 1.0,
            fortschritt_alle: 15,
            leerlauf_poll_ms: 100,
        }
    }
}

impl AudioEinstellungen {
    pub fn leerlauf_poll(&self) -> Duration {
        Duration::from_millis(self.leerlauf_poll_ms)
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ClientConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft die Werte auf Plausibilitaet
    pub fn validieren(&self) -> boww_core::Result<()> {
        if !(0.0..=1.0).contains(&self.audio.confidence) {
            return Err(BowwError::Konfiguration(format!(
                "audio.confidence muss zwischen 0.0 und 1.0 liegen (war: {})",
                self.audio.confidence
            )));
        }
        if self.discovery.timeout_ms == 0 {
            return Err(BowwError::konfiguration(
                "discovery.timeout_ms darf nicht 0 sein",
            ));
        }
        if self.audio.leerlauf_poll_ms == 0 {
            return Err(BowwError::konfiguration(
                "audio.leerlauf_poll_ms darf nicht 0 sein",
            ));
        }
        if self.verbindung.max_versuche() == 0 {
            return Err(BowwError::konfiguration(
                "verbindung.onboarding_versuche darf nicht 0 sein",
            ));
        }
        if let Some(server) = &self.discovery.server {
            server.parse::<boww_core::ServiceRecord>()?;
        }
        if !boww_observability::log_level_gueltig(&self.logging.level) {
            return Err(BowwError::Konfiguration(format!(
                "logging.level muss trace, debug, info, warn oder error sein (war: '{}')",
                self.logging.level
            )));
        }
        if !boww_observability::log_format_gueltig(&self.logging.format) {
            return Err(BowwError::Konfiguration(format!(
                "logging.format muss 'text' oder 'json' sein (war: '{}')",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.discovery.service_typ, "_boww._tcp.local.");
        assert_eq!(cfg.discovery.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.audio.confidence, 1.0);
        assert_eq!(cfg.audio.fortschritt_alle, 15);
        assert_eq!(cfg.verbindung.onboarding_abbruch, OnboardingPolitik::Abbrechen);
        assert_eq!(cfg.verbindung.max_versuche(), 1);
        assert!(cfg.validieren().is_ok());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [discovery]
            server = "192.168.0.10:9002"

            [verbindung]
            onboarding_abbruch = "erneut_verbinden"
            onboarding_versuche = 5

            [audio]
            datei = "probe.wav"
            confidence = 0.8
        "#;
        let cfg: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.discovery.server.as_deref(), Some("192.168.0.10:9002"));
        assert_eq!(cfg.verbindung.max_versuche(), 5);
        assert_eq!(cfg.audio.datei, PathBuf::from("probe.wav"));
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.discovery.timeout_ms, 5_000);
        assert_eq!(cfg.audio.leerlauf_poll_ms, 100);
        assert!(cfg.validieren().is_ok());
    }

    #[test]
    fn confidence_ausserhalb_bereich() {
        let mut cfg = ClientConfig::default();
        cfg.audio.confidence = 1.5;
        assert!(cfg.validieren().is_err());
        cfg.audio.confidence = f32::NAN;
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn ungueltige_server_adresse() {
        let mut cfg = ClientConfig::default();
        cfg.discovery.server = Some("boww.local".into());
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn ungueltige_logging_werte() {
        let mut cfg = ClientConfig::default();
        cfg.logging.level = "laut".into();
        assert!(cfg.validieren().is_err());

        cfg.logging.level = "debug".into();
        cfg.logging.format = "xml".into();
        assert!(cfg.validieren().is_err());

        cfg.logging.format = "json".into();
        assert!(cfg.validieren().is_ok());
    }

    #[test]
    fn null_versuche_ungueltig() {
        let mut cfg = ClientConfig::default();
        cfg.verbindung.onboarding_abbruch = OnboardingPolitik::ErneutVerbinden;
        cfg.verbindung.onboarding_versuche = 0;
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn fehlende_datei_liefert_standard() {
        let cfg = ClientConfig::laden("/nicht/vorhanden/client.toml").unwrap();
        assert_eq!(cfg.logging.level, "info");
    }
}
