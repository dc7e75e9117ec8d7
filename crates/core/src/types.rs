//! Gemeinsame Identifikationstypen fuer StrategyOS
//!
//! IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! Modellnamen, Anfrage-IDs und beliebigen Strings auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Abtastrate des Mikrofon-Capture (ausgehend, Hz)
pub const CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// Abtastrate des Playback-Buffers (eingehend, Hz)
pub const PLAYBACK_SAMPLE_RATE: u32 = 24_000;

/// Identitaet eines Generator-Modells (z.B. "gemini-2.5-flash")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Erstellt eine neue ModelId
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Gibt den Modellnamen zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Eindeutige ID einer Generierungs-Anfrage (fuer Tracing-Spans)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Erstellt eine neue zufaellige RequestId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req:{}", self.0)
    }
}
