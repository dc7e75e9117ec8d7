//! Anwendungs-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, die CLI laeuft also auch ohne Konfigurationsdatei.
//! Bibliotheks-Crates lesen nie selbst Dateien oder Umgebung, sie
//! bekommen die hier abgeleiteten Kontext-Structs.

use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use strategyos_audio::CaptureConfig;
use strategyos_core::{ModelId, CAPTURE_SAMPLE_RATE, PLAYBACK_SAMPLE_RATE};
use strategyos_gate::gemini::STANDARD_BASIS_URL;
use strategyos_gate::{GateConfig, GeminiConfig, ModelRoute, STANDARD_MAX_VERSUCHE};
use strategyos_observability::{log_format_gueltig, log_level_gueltig};

/// Umgebungsvariable fuer den Konfigurationspfad
pub const ENV_CONFIG: &str = "STRATEGYOS_CONFIG";
/// Umgebungsvariable fuer den API-Schluessel
pub const ENV_API_SCHLUESSEL: &str = "GEMINI_API_KEY";
/// Standard-Dateiname der Konfiguration
pub const STANDARD_CONFIG_PFAD: &str = "strategyos.toml";

/// Vollstaendige Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quality-Gate
    pub gate: GateEinstellungen,
    /// HTTP-Generator
    pub gemini: GeminiEinstellungen,
    /// Audio-Codec
    pub audio: AudioEinstellungen,
    /// Logging
    pub logging: LoggingEinstellungen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateEinstellungen {
    /// Maximale Generieren-und-Pruefen-Zyklen (>= 1)
    pub max_versuche: u32,
    pub primaer_modell: String,
    /// Modell fuer genau einen Ausweichversuch bei Rate-Limit
    pub fallback_modell: String,
    pub system_anweisung: String,
    /// Lexikon-Filter vor der Pruefung anwenden
    pub auto_korrektur: bool,
}

impl Default for GateEinstellungen {
    fn default() -> Self {
        let route = ModelRoute::default();
        Self {
            max_versuche: STANDARD_MAX_VERSUCHE,
            primaer_modell: route.primaer.to_string(),
            fallback_modell: route.fallback.to_string(),
            system_anweisung: String::new(),
            auto_korrektur: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiEinstellungen {
    /// API-Schluessel (leer = aus `GEMINI_API_KEY`)
    pub api_schluessel: Option<String>,
    pub basis_url: String,
    pub timeout_sekunden: u64,
}

impl Default for GeminiEinstellungen {
    fn default() -> Self {
        Self {
            api_schluessel: None,
            basis_url: STANDARD_BASIS_URL.into(),
            timeout_sekunden: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioEinstellungen {
    /// Mikrofon-Abtastrate in Hz
    pub capture_rate: u32,
    /// Abtastrate eingehender Frames in Hz
    pub playback_rate: u32,
    /// RMS-Schwelle fuer Sprecherkennung
    pub sprech_schwelle: f32,
}

impl Default for AudioEinstellungen {
    fn default() -> Self {
        Self {
            capture_rate: CAPTURE_SAMPLE_RATE,
            playback_rate: PLAYBACK_SAMPLE_RATE,
            sprech_schwelle: CaptureConfig::default().sprech_schwelle,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Herkunft einer geladenen Konfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigQuelle {
    Datei,
    /// Datei fehlte, alle Werte sind Standardwerte
    Standardwerte,
}

impl AppConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert,
    /// die Quelle meldet das dem Aufrufer fuer das Logging.
    pub fn laden(pfad: &str) -> anyhow::Result<(Self, ConfigQuelle)> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config = Self::aus_toml(&inhalt)
                    .with_context(|| format!("Konfigurationsfehler in '{pfad}'"))?;
                Ok((config, ConfigQuelle::Datei))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok((Self::default(), ConfigQuelle::Standardwerte))
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    pub fn aus_toml(inhalt: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(inhalt)?)
    }

    /// Pfad aus Flag, sonst `STRATEGYOS_CONFIG`, sonst `strategyos.toml`
    pub fn pfad_aufloesen(flag: Option<String>, env: Option<String>) -> String {
        flag.or(env)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| STANDARD_CONFIG_PFAD.into())
    }

    pub fn validieren(&self) -> anyhow::Result<()> {
        if self.gate.max_versuche == 0 {
            bail!("gate.max_versuche muss mindestens 1 sein");
        }
        if self.gate.primaer_modell.trim().is_empty() || self.gate.fallback_modell.trim().is_empty() {
            bail!("gate.primaer_modell und gate.fallback_modell duerfen nicht leer sein");
        }
        if self.audio.capture_rate == 0 || self.audio.playback_rate == 0 {
            bail!("audio.capture_rate und audio.playback_rate muessen groesser 0 sein");
        }
        if !(0.0..=1.0).contains(&self.audio.sprech_schwelle) {
            bail!(
                "audio.sprech_schwelle muss zwischen 0 und 1 liegen, ist {}",
                self.audio.sprech_schwelle
            );
        }
        if self.gemini.timeout_sekunden == 0 {
            bail!("gemini.timeout_sekunden muss groesser 0 sein");
        }
        if !log_level_gueltig(&self.logging.level) {
            bail!("Ungueltiges Log-Level: {}", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            bail!("Ungueltiges Log-Format: {}", self.logging.format);
        }
        Ok(())
    }

    pub fn gate_config(&self) -> GateConfig {
        GateConfig {
            max_versuche: self.gate.max_versuche,
            route: ModelRoute {
                primaer: ModelId::new(self.gate.primaer_modell.clone()),
                fallback: ModelId::new(self.gate.fallback_modell.clone()),
            },
            system_anweisung: self.gate.system_anweisung.clone(),
            auto_korrektur: self.gate.auto_korrektur,
        }
    }

    /// Schluessel aus der Datei hat Vorrang vor `env_schluessel`
    pub fn gemini_config(&self, env_schluessel: Option<String>) -> anyhow::Result<GeminiConfig> {
        let schluessel = self
            .gemini
            .api_schluessel
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or(env_schluessel.filter(|s| !s.trim().is_empty()))
            .with_context(|| {
                format!("Kein API-Schluessel: gemini.api_schluessel oder {ENV_API_SCHLUESSEL} setzen")
            })?;
        Ok(GeminiConfig {
            api_schluessel: schluessel,
            basis_url: self.gemini.basis_url.clone(),
            timeout: Duration::from_secs(self.gemini.timeout_sekunden),
        })
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.audio.capture_rate,
            sprech_schwelle: self.audio.sprech_schwelle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = AppConfig::default();
        assert!(cfg.validieren().is_ok());
        assert_eq!(cfg.gate.max_versuche, 3);
        assert_eq!(cfg.audio.capture_rate, 16_000);
        assert_eq!(cfg.audio.playback_rate, 24_000);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.gate.auto_korrektur);
    }

    #[test]
    fn config_aus_toml_string() {
        let cfg = AppConfig::aus_toml(
            r#"
            [gate]
            max_versuche = 5
            primaer_modell = "modell-a"

            [audio]
            sprech_schwelle = 0.01
        "#,
        )
        .unwrap();
        assert_eq!(cfg.gate.max_versuche, 5);
        assert_eq!(cfg.gate.primaer_modell, "modell-a");
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.gate.fallback_modell, ModelRoute::default().fallback.to_string());
        assert_eq!(cfg.audio.capture_rate, 16_000);

        let gate = cfg.gate_config();
        assert_eq!(gate.max_versuche, 5);
        assert_eq!(gate.route.primaer.as_str(), "modell-a");
        assert_eq!(cfg.capture_config().sprech_schwelle, 0.01);
    }

    #[test]
    fn kaputtes_toml_ist_fehler() {
        assert!(AppConfig::aus_toml("[gate\nmax_versuche = ").is_err());
        assert!(AppConfig::aus_toml("[gate]\nmax_versuche = \"drei\"").is_err());
    }

    #[test]
    fn fehlende_datei_liefert_standard() {
        let (cfg, quelle) = AppConfig::laden("/nicht/vorhanden/strategyos.toml").unwrap();
        assert_eq!(cfg.gate.max_versuche, 3);
        assert_eq!(quelle, ConfigQuelle::Standardwerte);
    }

    #[test]
    fn vorhandene_datei_wird_gelesen() {
        let pfad = std::env::temp_dir().join(format!("strategyos-{}.toml", std::process::id()));
        std::fs::write(&pfad, "[gate]\nmax_versuche = 4\n").unwrap();
        let ergebnis = AppConfig::laden(pfad.to_str().unwrap());
        std::fs::remove_file(&pfad).unwrap();

        let (cfg, quelle) = ergebnis.unwrap();
        assert_eq!(cfg.gate.max_versuche, 4);
        assert_eq!(quelle, ConfigQuelle::Datei);
    }

    #[test]
    fn validierung_lehnt_ab() {
        let mut cfg = AppConfig::default();
        cfg.gate.max_versuche = 0;
        assert!(cfg.validieren().is_err());

        let mut cfg = AppConfig::default();
        cfg.audio.playback_rate = 0;
        assert!(cfg.validieren().is_err());

        let mut cfg = AppConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validieren().is_err());

        let mut cfg = AppConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn pfad_reihenfolge() {
        assert_eq!(
            AppConfig::pfad_aufloesen(Some("a.toml".into()), Some("b.toml".into())),
            "a.toml"
        );
        assert_eq!(AppConfig::pfad_aufloesen(None, Some("b.toml".into())), "b.toml");
        assert_eq!(AppConfig::pfad_aufloesen(None, None), STANDARD_CONFIG_PFAD);
    }

    #[test]
    fn api_schluessel_quellen() {
        let mut cfg = AppConfig::default();
        assert!(cfg.gemini_config(None).is_err());
        assert!(cfg.gemini_config(Some("  ".into())).is_err());
        assert_eq!(
            cfg.gemini_config(Some("env".into())).unwrap().api_schluessel,
            "env"
        );

        cfg.gemini.api_schluessel = Some("datei".into());
        let gemini = cfg.gemini_config(Some("env".into())).unwrap();
        assert_eq!(gemini.api_schluessel, "datei");
        assert_eq!(gemini.timeout, Duration::from_secs(60));
    }
}
