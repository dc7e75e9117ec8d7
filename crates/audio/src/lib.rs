//! strategyos-audio – Audio-Codec-Schicht der Live-Voice-Session
//!
//! Konvertiert zwischen den vier Darstellungen eines Audiosignals:
//! - f32-Samples im Bereich -1.0..1.0
//! - PCM16 (i16, Little Endian auf dem Draht)
//! - Base64-Wire-Frames (Text, eingebettet in JSON-Nachrichten)
//! - RMS-Pegel fuer UI-Meter und Sprecherwechsel
//!
//! Dazu kommen der Capture-Encoder (Mikrofon -> Wire) und die
//! geordnete Playback-Queue (Wire -> Lautsprecher).

pub mod capture;
pub mod codec;
pub mod error;
pub mod playback;
pub mod volume;
pub mod wire;

// Bequeme Re-Exporte der wichtigsten Typen
pub use capture::{CaptureConfig, CaptureEncoder, CaptureFrame};
pub use codec::{base64_to_float32, pcm16_to_base64, sample_buffer_to_pcm16, SampleBuffer};
pub use error::{AudioError, AudioResult};
pub use playback::{PlaybackQueue, PlaybackSink, PlaybackStatistik};
pub use volume::rms_volume;
pub use wire::{parse_media_chunk, pcm_mime_type, MediaChunk};
