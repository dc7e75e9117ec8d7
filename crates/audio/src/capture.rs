//! Capture-Encoder: Mikrofon-Buffer -> Wire-Chunk + Pegel
//!
//! Pro Mikrofon-Callback wird genau ein `CaptureFrame` erzeugt. Der
//! Pegel treibt das UI-Meter, `spricht` die Sprecherwechsel-Heuristik.

use strategyos_core::CAPTURE_SAMPLE_RATE;

use crate::volume::rms_volume;
use crate::wire::MediaChunk;

/// Konfiguration fuer den Capture-Encoder
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Abtastrate des Mikrofons in Hz
    pub sample_rate: u32,
    /// RMS-Schwelle ab der Sprache angenommen wird (-46 dBFS)
    pub sprech_schwelle: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: CAPTURE_SAMPLE_RATE,
            sprech_schwelle: 0.005,
        }
    }
}

/// Ergebnis eines kodierten Mikrofon-Buffers
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    /// Ausgehender Chunk
    pub chunk: MediaChunk,
    /// RMS-Pegel des Buffers
    pub pegel: f32,
    /// Ob der Pegel ueber der Sprechschwelle liegt
    pub spricht: bool,
}

/// Zustandsloser Encoder fuer ausgehendes Mikrofon-Audio
#[derive(Debug, Clone, Default)]
pub struct CaptureEncoder {
    config: CaptureConfig,
}

impl CaptureEncoder {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Kodiert einen Mikrofon-Buffer
    pub fn encode(&self, samples: &[f32]) -> CaptureFrame {
        let pegel = rms_volume(samples);
        CaptureFrame {
            chunk: MediaChunk::aus_samples(samples, self.config.sample_rate),
            pegel,
            spricht: pegel > self.config.sprech_schwelle,
        }
    }
}
