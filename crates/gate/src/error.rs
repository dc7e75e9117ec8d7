//! Fehlertypen fuer das Quality-Gate
//!
//! Constraint-Verletzungen und erschoepfte Versuche sind keine
//! Fehler, sondern Rueckgabewerte (`ConstraintResult`, `GenerationOutcome`).

use strategyos_core::ModelId;
use thiserror::Error;

/// Fehler des externen Text-Generators
#[derive(Debug, Clone, Error)]
pub enum GeneratorError {
    /// Rate-Limit des Anbieters – loest genau einen Fallback aus
    #[error("Rate-Limit fuer Modell {modell}: {nachricht}")]
    RateLimit { modell: ModelId, nachricht: String },

    /// Voruebergehend nicht erreichbar (5xx, Timeout, Verbindungsabbruch)
    #[error("Generator voruebergehend nicht verfuegbar: {0}")]
    NichtVerfuegbar(String),

    /// Nicht wiederholbarer Fehler (Auth, ungueltige Anfrage, unlesbare Antwort)
    #[error("Generator-Anfrage fehlgeschlagen: {0}")]
    Anfrage(String),
}

impl GeneratorError {
    /// Gibt true zurueck wenn der Fehler ein Rate-Limit ist
    pub fn ist_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimit { .. })
    }

    /// Gibt true zurueck wenn ein spaeterer Versuch erfolgreich sein koennte
    pub fn ist_voruebergehend(&self) -> bool {
        matches!(self, Self::RateLimit { .. } | Self::NichtVerfuegbar(_))
    }
}

/// Alle moeglichen Fehler des Quality-Gates
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("Antwort nicht normalisierbar: {0}")]
    Normalisierung(String),

    #[error("Stapel-Task fehlgeschlagen: {0}")]
    Task(String),
}

pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klassifizierung() {
        let rl = GeneratorError::RateLimit {
            modell: "gemini-2.5-pro".into(),
            nachricht: "429".into(),
        };
        assert!(rl.ist_rate_limit());
        assert!(rl.ist_voruebergehend());
        assert!(!GeneratorError::NichtVerfuegbar("503".into()).ist_rate_limit());
        assert!(GeneratorError::NichtVerfuegbar("503".into()).ist_voruebergehend());
        assert!(!GeneratorError::Anfrage("401".into()).ist_voruebergehend());
    }

    #[test]
    fn fehler_anzeige() {
        let e: GateError = GeneratorError::Anfrage("API-Schluessel ungueltig".into()).into();
        assert_eq!(
            e.to_string(),
            "Generator-Anfrage fehlgeschlagen: API-Schluessel ungueltig"
        );
    }
}
