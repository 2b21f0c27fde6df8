//! Fehlertypen fuer die Audioquelle

use std::path::PathBuf;

use boww_protocol::AudioFormat;
use thiserror::Error;

/// Alle moeglichen Fehler der Audioquelle
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audioquelle nicht gefunden: {}", .0.display())]
    QuelleNichtGefunden(PathBuf),

    #[error("Audioquelle muss 16 kHz, Mono, 16 Bit PCM sein (aktuell: {aktuell}, float={float})")]
    FormatAbweichung { aktuell: AudioFormat, float: bool },

    #[error("WAV-Fehler: {0}")]
    Wav(#[from] hound::Error),
}

impl AudioError {
    /// Gibt true zurueck wenn die Quelle die Formatpruefung nicht besteht
    pub fn ist_formatfehler(&self) -> bool {
        matches!(self, Self::FormatAbweichung { .. })
    }
}

pub type AudioResult<T> = Result<T, AudioError>;
