//! Fehlertypen fuer die Audio-Codec-Schicht

use thiserror::Error;

/// Alle moeglichen Fehler der Audio-Schicht
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Ungueltiger Base64-Wire-Frame: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Ungueltige Wire-Nachricht: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Wiedergabe-Fehler: {0}")]
    Wiedergabe(String),

    #[error("Playback-Queue bereits geschlossen")]
    QueueGeschlossen,
}

pub type AudioResult<T> = Result<T, AudioError>;
