//! BoWW Test-Client – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und fuehrt einen Lauf
//! aus. Exit-Code 0 bei Server-Stop oder Ctrl-C, sonst 1.

use std::process::ExitCode;

use boww_client::{config::ClientConfig, Client};
use boww_core::StopGrund;
use boww_observability::logging_initialisieren;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad =
        std::env::var("BOWW_CLIENT_CONFIG").unwrap_or_else(|_| "client.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = match ClientConfig::laden(&config_pfad) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    logging_initialisieren(&config.logging.level, &config.logging.format);

    if let Err(e) = config.validieren() {
        tracing::error!(fehler = %e, config = %config_pfad, "Ungueltige Konfiguration");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "BoWW Test-Client wird initialisiert"
    );

    let client = Client::neu(config);

    // Ctrl-C beendet den Lauf ueber dasselbe Abbruchsignal
    let abbruch = client.abbruchsignal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C empfangen, Lauf wird beendet");
            abbruch.ausloesen(StopGrund::Unterbrechung);
        }
    });

    match client.starten().await {
        Ok(bericht) if bericht.grund.ist_regulaer() => ExitCode::SUCCESS,
        Ok(bericht) => {
            tracing::error!(grund = %bericht.grund, "Lauf mit Fehler beendet");
            ExitCode::FAILURE
        }
        Err(boww_client::error::ClientError::Unterbrochen) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(fehler = %e, "Lauf fehlgeschlagen");
            ExitCode::FAILURE
        }
    }
}
