//! strategyos-core – Gemeinsame Typen und Konstanten
//!
//! Dieses Crate stellt die Bausteine bereit, die Audio-Schicht und
//! Quality-Gate gemeinsam nutzen.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{ModelId, RequestId, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE};
