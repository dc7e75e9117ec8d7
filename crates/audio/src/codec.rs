//! PCM16 / Base64 Codec
//!
//! Reine Funktionen ohne Seiteneffekte, sicher im Echtzeit-Callback.
//!
//! Die Skalierung ist asymmetrisch, weil der i16-Bereich asymmetrisch ist
//! (-32768..32767): negative Samples werden mit 32768 multipliziert,
//! nicht-negative mit 32767. Die Rueckrichtung teilt mit genau denselben
//! Divisoren, sonst ist der Roundtrip nicht treu.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AudioResult;

/// Skalierung fuer negative Samples
const NEGATIV_SKALA: f32 = 32768.0;
/// Skalierung fuer nicht-negative Samples
const POSITIV_SKALA: f32 = 32767.0;

/// Unveraenderlicher Mono-Sample-Buffer mit fester Abtastrate
///
/// Alle Werte liegen nach der Konstruktion in -1.0..=1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Erstellt einen Buffer, Werte ausserhalb -1.0..=1.0 werden geclamped
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        let samples: Arc<[f32]> = samples.into_iter().map(|s| s.clamp(-1.0, 1.0)).collect();
        Self {
            samples,
            sample_rate,
        }
    }

    /// Dekodiert einen Wire-Frame direkt in einen Buffer
    pub fn aus_wire_frame(wire_frame: &str, sample_rate: u32) -> AudioResult<Self> {
        Ok(Self::new(base64_to_float32(wire_frame)?, sample_rate))
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Abspieldauer des Buffers (0 bei Abtastrate 0)
    pub fn dauer(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Quantisiert f32-Samples zu PCM16 (saettigend an beiden Enden)
pub fn sample_buffer_to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            let s = s.clamp(-1.0, 1.0);
            if s < 0.0 {
                (s * NEGATIV_SKALA).round() as i16
            } else {
                (s * POSITIV_SKALA).round() as i16
            }
        })
        .collect()
}

/// Kodiert einen PCM16-Frame als Standard-Base64 (Little Endian, mit Padding)
pub fn pcm16_to_base64(frame: &[i16]) -> String {
    let mut bytes = Vec::with_capacity(frame.len() * 2);
    for sample in frame {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    STANDARD.encode(bytes)
}

/// Dekodiert einen Base64-Wire-Frame zurueck zu f32-Samples
///
/// Ein unvollstaendiges letztes Byte (ungerade Byte-Anzahl) wird verworfen.
/// Ungueltiges Base64 liefert `AudioError::Base64`.
pub fn base64_to_float32(wire_frame: &str) -> AudioResult<Vec<f32>> {
    let bytes = STANDARD.decode(wire_frame)?;
    Ok(bytes
        .chunks_exact(2)
        .map(|paar| {
            let wert = i16::from_le_bytes([paar[0], paar[1]]);
            if wert < 0 {
                wert as f32 / NEGATIV_SKALA
            } else {
                wert as f32 / POSITIV_SKALA
            }
        })
        .collect())
}
