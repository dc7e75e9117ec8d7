//! Wire-Umschlag fuer Audio-Chunks
//!
//! Der Base64-Frame wird als String-Wert in eine JSON-Nachricht
//! eingebettet: `{"data": "<base64>", "mimeType": "audio/pcm;rate=16000"}`.
//! Mono, PCM16 Little Endian.

use serde::{Deserialize, Serialize};

use crate::codec::{base64_to_float32, pcm16_to_base64, sample_buffer_to_pcm16};
use crate::error::AudioResult;

/// MIME-Typ fuer rohes PCM16 mit gegebener Abtastrate
pub fn pcm_mime_type(sample_rate: u32) -> String {
    format!("audio/pcm;rate={sample_rate}")
}

/// Ein Audio-Chunk wie er ueber den Transport geht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaChunk {
    /// Base64-kodierte PCM16-Bytes
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl MediaChunk {
    /// Kodiert f32-Samples in einen Chunk (Vorwaertsrichtung)
    pub fn aus_samples(samples: &[f32], sample_rate: u32) -> Self {
        Self {
            data: pcm16_to_base64(&sample_buffer_to_pcm16(samples)),
            mime_type: pcm_mime_type(sample_rate),
        }
    }

    /// Dekodiert den Chunk zurueck zu f32-Samples
    pub fn zu_samples(&self) -> AudioResult<Vec<f32>> {
        base64_to_float32(&self.data)
    }

    /// Abtastrate aus dem MIME-Typ (`rate=` Parameter), falls vorhanden
    pub fn sample_rate(&self) -> Option<u32> {
        self.mime_type
            .split(';')
            .filter_map(|teil| teil.trim().strip_prefix("rate="))
            .find_map(|rate| rate.parse().ok())
    }

    /// Serialisiert den Chunk als JSON-Text-Frame
    pub fn to_json(&self) -> AudioResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parst einen eingehenden JSON-Chunk
pub fn parse_media_chunk(json: &str) -> AudioResult<MediaChunk> {
    Ok(serde_json::from_str(json)?)
}
