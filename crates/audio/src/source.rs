//! WAV-Audioquelle
//!
//! Oeffnet eine WAV-Datei, prueft das Format strikt gegen das Server-Format
//! und liefert die Samples in Frames zu `FRAME_SAMPLES` in Quellreihenfolge.
//!
//! Die Pruefung ist eine Vorbedingung: schlaegt sie fehl, wird kein einziger
//! Frame erzeugt.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use boww_protocol::{AudioFormat, AudioFrame, FRAME_SAMPLES};
use hound::{SampleFormat, WavReader};

use crate::error::{AudioError, AudioResult};

/// Validierte WAV-Quelle
pub struct WavQuelle<R: Read = BufReader<File>> {
    reader: WavReader<R>,
    format: AudioFormat,
    naechster_index: u64,
    erschoepft: bool,
}

impl WavQuelle<BufReader<File>> {
    /// Oeffnet und prueft eine WAV-Datei
    pub fn oeffnen(pfad: impl AsRef<Path>) -> AudioResult<Self> {
        let pfad = pfad.as_ref();
        let reader = WavReader::open(pfad).map_err(|e| match e {
            hound::Error::IoError(fehler) if fehler.kind() == io::ErrorKind::NotFound => {
                AudioError::QuelleNichtGefunden(pfad.to_path_buf())
            }
            andere => AudioError::Wav(andere),
        })?;
        let quelle = Self::pruefen(reader)?;
        tracing::debug!(
            pfad = %pfad.display(),
            format = %quelle.format,
            frames = quelle.frame_anzahl(),
            "Audioquelle geoeffnet"
        );
        Ok(quelle)
    }
}

impl<R: Read> WavQuelle<R> {
    fn pruefen(reader: WavReader<R>) -> AudioResult<Self> {
        let spec = reader.spec();
        let format = AudioFormat {
            kanaele: spec.channels,
            abtastrate: spec.sample_rate,
            bits_pro_sample: spec.bits_per_sample,
        };
        let float = spec.sample_format == SampleFormat::Float;

        if !format.ist_server_format() || float {
            return Err(AudioError::FormatAbweichung {
                aktuell: format,
                float,
            });
        }

        Ok(Self {
            reader,
            format,
            naechster_index: 0,
            erschoepft: false,
        })
    }

    /// Gibt das (gepruefte) Format der Quelle zurueck
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Anzahl der Frames, die die Quelle insgesamt liefert
    pub fn frame_anzahl(&self) -> u64 {
        u64::from(self.reader.duration()).div_ceil(FRAME_SAMPLES as u64)
    }

    /// Liest den naechsten Frame
    ///
    /// Gibt `None` am Ende der Quelle zurueck. Der letzte Frame kann kuerzer
    /// als `FRAME_SAMPLES` sein.
    pub fn naechster_frame(&mut self) -> AudioResult<Option<AudioFrame>> {
        if self.erschoepft {
            return Ok(None);
        }

        let samples = self
            .reader
            .samples::<i16>()
            .take(FRAME_SAMPLES)
            .collect::<Result<Vec<i16>, _>>()?;

        if samples.len() < FRAME_SAMPLES {
            self.erschoepft = true;
        }
        if samples.is_empty() {
            return Ok(None);
        }

        let frame = AudioFrame::aus_samples(self.naechster_index, &samples);
        self.naechster_index += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};
    use std::path::PathBuf;

    fn wav_schreiben(
        dir: &tempfile::TempDir,
        name: &str,
        spec: WavSpec,
        samples: usize,
    ) -> PathBuf {
        let pfad = dir.path().join(name);
        let mut writer = WavWriter::create(&pfad, spec).unwrap();
        for i in 0..samples {
            for _ in 0..spec.channels {
                writer.write_sample((i % 1000) as i16).unwrap();
            }
        }
        writer.finalize().unwrap();
        pfad
    }

    fn server_spec() -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn frames_in_quellreihenfolge() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = wav_schreiben(&dir, "ok.wav", server_spec(), FRAME_SAMPLES * 3);

        let mut quelle = WavQuelle::oeffnen(&pfad).unwrap();
        assert_eq!(quelle.frame_anzahl(), 3);

        let mut indizes = Vec::new();
        let mut alle_samples = Vec::new();
        while let Some(frame) = quelle.naechster_frame().unwrap() {
            assert!(frame.ist_vollstaendig());
            indizes.push(frame.index);
            for paar in frame.daten.chunks_exact(2) {
                alle_samples.push(i16::from_le_bytes([paar[0], paar[1]]));
            }
        }
        assert_eq!(indizes, vec![0, 1, 2]);
        let erwartet: Vec<i16> = (0..FRAME_SAMPLES * 3).map(|i| (i % 1000) as i16).collect();
        assert_eq!(alle_samples, erwartet);
        assert!(quelle.naechster_frame().unwrap().is_none());
    }

    #[test]
    fn letzter_frame_darf_kuerzer_sein() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = wav_schreiben(&dir, "rest.wav", server_spec(), FRAME_SAMPLES + 100);

        let mut quelle = WavQuelle::oeffnen(&pfad).unwrap();
        assert_eq!(quelle.frame_anzahl(), 2);
        let erster = quelle.naechster_frame().unwrap().unwrap();
        let zweiter = quelle.naechster_frame().unwrap().unwrap();
        assert_eq!(erster.sample_anzahl(), FRAME_SAMPLES);
        assert_eq!(zweiter.sample_anzahl(), 100);
        assert!(quelle.naechster_frame().unwrap().is_none());
    }

    #[test]
    fn fehlende_datei() {
        let dir = tempfile::tempdir().unwrap();
        let err = WavQuelle::oeffnen(dir.path().join("gibt-es-nicht.wav"))
            .err()
            .unwrap();
        assert!(matches!(err, AudioError::QuelleNichtGefunden(_)));
    }

    #[test]
    fn schmalband_wird_abgelehnt() {
        let dir = tempfile::tempdir().unwrap();
        let spec = WavSpec {
            sample_rate: 8_000,
            ..server_spec()
        };
        let pfad = wav_schreiben(&dir, "8k.wav", spec, FRAME_SAMPLES);
        let err = WavQuelle::oeffnen(&pfad).err().unwrap();
        assert!(err.ist_formatfehler());
        assert!(err.to_string().contains("8000 Hz"));
    }

    #[test]
    fn stereo_wird_abgelehnt() {
        let dir = tempfile::tempdir().unwrap();
        let spec = WavSpec {
            channels: 2,
            ..server_spec()
        };
        let pfad = wav_schreiben(&dir, "stereo.wav", spec, FRAME_SAMPLES);
        assert!(WavQuelle::oeffnen(&pfad).err().unwrap().ist_formatfehler());
    }

    #[test]
    fn float_wird_abgelehnt() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = dir.path().join("float.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&pfad, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();
        assert!(WavQuelle::oeffnen(&pfad).err().unwrap().ist_formatfehler());
    }

    #[test]
    fn leere_quelle_liefert_keine_frames() {
        let dir = tempfile::tempdir().unwrap();
        let pfad = wav_schreiben(&dir, "leer.wav", server_spec(), 0);
        let mut quelle = WavQuelle::oeffnen(&pfad).unwrap();
        assert_eq!(quelle.frame_anzahl(), 0);
        assert!(quelle.naechster_frame().unwrap().is_none());
    }
}
