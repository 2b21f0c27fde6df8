//! Audio-Protokoll (WebSocket-Binaerframes)
//!
//! Jeder Binaerframe enthaelt genau einen Audio-Frame: rohe PCM-Samples,
//! 16 Bit signed, little-endian, Mono, 16 kHz. Kein Header, keine
//! Sequenznummer auf dem Draht; die Reihenfolge ergibt sich aus der
//! Sendereihenfolge.
//!
//! ```text
//! Offset  Len   Beschreibung
//! ------  ----  -----------
//!  0      2048  1024 Samples i16 LE
//! ```

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// Samples pro Frame
pub const FRAME_SAMPLES: usize = 1024;

/// Bytes pro Sample (16 Bit)
pub const BYTES_PRO_SAMPLE: usize = 2;

/// Bytes pro vollstaendigem Frame
pub const FRAME_BYTES: usize = FRAME_SAMPLES * BYTES_PRO_SAMPLE;

// ---------------------------------------------------------------------------
// AudioFormat
// ---------------------------------------------------------------------------

/// Format einer Audioquelle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    pub kanaele: u16,
    pub abtastrate: u32,
    pub bits_pro_sample: u16,
}

impl AudioFormat {
    /// Das einzige Format, das der Server akzeptiert: 16 kHz / Mono / 16 Bit
    pub const SERVER: Self = Self {
        kanaele: 1,
        abtastrate: 16_000,
        bits_pro_sample: 16,
    };

    /// Prueft ob dieses Format exakt dem Server-Format entspricht
    pub fn ist_server_format(&self) -> bool {
        *self == Self::SERVER
    }

    /// Abspieldauer eines vollstaendigen Frames in diesem Format
    ///
    /// Beim Server-Format 1024 / 16000 s = 64 ms.
    pub fn frame_intervall(&self) -> Duration {
        let rate = u64::from(self.abtastrate.max(1));
        Duration::from_nanos(FRAME_SAMPLES as u64 * 1_000_000_000 / rate)
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} Hz, {} Kanal/Kanaele, {} Bit",
            self.abtastrate, self.kanaele, self.bits_pro_sample
        )
    }
}

// ---------------------------------------------------------------------------
// AudioFrame
// ---------------------------------------------------------------------------

/// Ein Block PCM-Samples, die atomare Einheit der Uebertragung
///
/// Der letzte Frame einer Quelle kann weniger als `FRAME_SAMPLES` Samples
/// enthalten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Position in der Quelle (0-basiert)
    pub index: u64,
    /// PCM-Daten, i16 little-endian
    pub daten: Bytes,
}

impl AudioFrame {
    /// Erstellt einen Frame aus Samples
    pub fn aus_samples(index: u64, samples: &[i16]) -> Self {
        let mut buf = BytesMut::with_capacity(samples.len() * BYTES_PRO_SAMPLE);
        for sample in samples {
            buf.put_i16_le(*sample);
        }
        Self {
            index,
            daten: buf.freeze(),
        }
    }

    /// Anzahl der Samples im Frame
    pub fn sample_anzahl(&self) -> usize {
        self.daten.len() / BYTES_PRO_SAMPLE
    }

    /// Gibt true zurueck wenn der Frame volle `FRAME_SAMPLES` enthaelt
    pub fn ist_vollstaendig(&self) -> bool {
        self.daten.len() == FRAME_BYTES
    }

    /// Payload fuer den Binaerframe
    pub fn into_nutzdaten(self) -> Vec<u8> {
        self.daten.to_vec()
    }
}
