//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable, Vorrang vor der Konfigurationsdatei:
//! - `SO_LOG_LEVEL`: Log-Level oder Filter-Direktive, Standard: info
//! - `SO_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Request-IDs des Quality-Gates erscheinen als Span-Felder.

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "SO_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "SO_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Ungueltiges Log-Format: {0} (erlaubt: text, json)")]
    Format(String),

    #[error("Ungueltiger Log-Filter '{filter}': {grund}")]
    Filter { filter: String, grund: String },

    #[error("Logging bereits initialisiert: {0}")]
    BereitsInitialisiert(String),
}

/// Ausgabeformat der Log-Zeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            anderes => Err(LoggingError::Format(anderes.to_string())),
        }
    }
}

/// Aufgeloeste Logging-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEinstellungen {
    pub filter: String,
    pub format: LogFormat,
}

impl LogEinstellungen {
    /// Umgebungswerte ueberschreiben die Konfigurationswerte
    pub fn aufloesen(
        level: &str,
        format: &str,
        env_level: Option<String>,
        env_format: Option<String>,
    ) -> Result<Self, LoggingError> {
        let filter = env_level
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| level.to_string());
        let format = env_format
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| format.to_string())
            .parse()?;
        Ok(Self { filter, format })
    }

    /// Wie `aufloesen`, liest `SO_LOG_LEVEL` und `SO_LOG_FORMAT`
    pub fn aus_umgebung(level: &str, format: &str) -> Result<Self, LoggingError> {
        Self::aufloesen(
            level,
            format,
            std::env::var(ENV_LOG_LEVEL).ok(),
            std::env::var(ENV_LOG_FORMAT).ok(),
        )
    }
}

/// Initialisiert das Logging-System.
///
/// Ausgabe geht nach stderr. Ein zweiter Aufruf liefert einen Fehler
/// statt zu paniken.
pub fn logging_initialisieren(level: &str, format: &str) -> Result<(), LoggingError> {
    let einstellungen = LogEinstellungen::aus_umgebung(level, format)?;
    let filter = EnvFilter::try_new(&einstellungen.filter).map_err(|e| LoggingError::Filter {
        filter: einstellungen.filter.clone(),
        grund: e.to_string(),
    })?;

    let ergebnis = match einstellungen.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };
    ergebnis.map_err(|e| LoggingError::BereitsInitialisiert(e.to_string()))
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    format.parse::<LogFormat>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_werte() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(log_level_gueltig(level));
        }
        assert!(!log_level_gueltig("verbose"));
        assert!(!log_level_gueltig("INFO")); // Gross-/Kleinschreibung
        assert!(!log_level_gueltig(""));
    }

    #[test]
    fn log_format_werte() {
        assert!(log_format_gueltig("text"));
        assert!(log_format_gueltig("json"));
        assert!(!log_format_gueltig("xml"));
        assert!(!log_format_gueltig("JSON"));
    }

    #[test]
    fn ohne_umgebung_gilt_konfiguration() {
        let e = LogEinstellungen::aufloesen("debug", "json", None, None).unwrap();
        assert_eq!(e.filter, "debug");
        assert_eq!(e.format, LogFormat::Json);
    }

    #[test]
    fn umgebung_hat_vorrang() {
        let e = LogEinstellungen::aufloesen(
            "info",
            "text",
            Some("strategyos_gate=trace".into()),
            Some("json".into()),
        )
        .unwrap();
        assert_eq!(e.filter, "strategyos_gate=trace");
        assert_eq!(e.format, LogFormat::Json);
    }

    #[test]
    fn leere_umgebung_wird_ignoriert() {
        let e = LogEinstellungen::aufloesen("warn", "text", Some(" ".into()), Some("".into())).unwrap();
        assert_eq!(e.filter, "warn");
        assert_eq!(e.format, LogFormat::Text);
    }

    #[test]
    fn ungueltiges_format() {
        assert!(matches!(
            LogEinstellungen::aufloesen("info", "yaml", None, None),
            Err(LoggingError::Format(_))
        ));
    }

    #[test]
    fn zweite_initialisierung_ist_fehler() {
        // Erster Aufruf kann erfolgreich sein, der zweite nie
        let _ = logging_initialisieren("info", "text");
        assert!(matches!(
            logging_initialisieren("info", "text"),
            Err(LoggingError::BereitsInitialisiert(_))
        ));
    }
}
