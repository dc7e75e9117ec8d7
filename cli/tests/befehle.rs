//! Integration-Tests fuer die CLI-Befehle ohne Netzwerk

use std::sync::Arc;

use async_trait::async_trait;
use strategyos_cli::config::AppConfig;
use strategyos_core::ModelId;
use strategyos_gate::{GateStatus, GeneratorError, QualityGate, TextGenerator};

/// Liefert immer denselben Text
struct FesterGenerator(&'static str);

#[async_trait]
impl TextGenerator for FesterGenerator {
    async fn generate(
        &self,
        _system_instruction: &str,
        _prompt: &str,
        _model: &ModelId,
    ) -> Result<String, GeneratorError> {
        Ok(self.0.to_string())
    }
}

/// Scheitert fatal fuer Prompts mit "kaputt", antwortet sonst mit dem Prompt
struct WaehlerischerGenerator;

#[async_trait]
impl TextGenerator for WaehlerischerGenerator {
    async fn generate(
        &self,
        _system_instruction: &str,
        prompt: &str,
        _model: &ModelId,
    ) -> Result<String, GeneratorError> {
        if prompt.contains("kaputt") {
            Err(GeneratorError::Anfrage("401 Unauthorized".into()))
        } else {
            Ok(format!("Entwurf zu {prompt}"))
        }
    }
}

fn gate_aus_toml(toml: &str, text: &'static str) -> QualityGate {
    let config = AppConfig::aus_toml(toml).unwrap();
    config.validieren().unwrap();
    QualityGate::new(Arc::new(FesterGenerator(text)), config.gate_config()).unwrap()
}

#[tokio::test]
async fn generieren_mit_konfiguriertem_budget() {
    let gate = gate_aus_toml("[gate]\nmax_versuche = 2\nauto_korrektur = false", "This is crucial.");
    let outcome = strategyos_cli::generieren(&gate, "Thema").await.unwrap();

    assert_eq!(outcome.status, GateStatus::Erschoepft);
    assert_eq!(outcome.versuche, 2);
    assert_eq!(outcome.text, "This is crucial.");
    assert_eq!(outcome.modell.as_str(), "gemini-2.5-pro");
}

#[tokio::test]
async fn generieren_mit_auto_korrektur() {
    let gate = gate_aus_toml("[gate]\nprimaer_modell = \"modell-x\"", "This is crucial.");
    let outcome = strategyos_cli::generieren(&gate, "Thema").await.unwrap();

    assert!(outcome.ist_bestanden());
    assert_eq!(outcome.text, "This is key.");
    assert_eq!(outcome.modell.as_str(), "modell-x");

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "akzeptiert");
    assert!(json.get("grund").is_none());
}

#[test]
fn pruefen_liefert_json_form() {
    let ergebnis = strategyos_cli::pruefen(&format!("{}\nmehr", "a".repeat(300)));
    let json = serde_json::to_value(&ergebnis).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(
        json["reason"],
        "Hook is too long (304 chars). Must be under 210 characters."
    );
}

#[tokio::test]
async fn stapel_behaelt_erfolge_bei_einzelfehler() {
    let gate = QualityGate::new(Arc::new(WaehlerischerGenerator), AppConfig::default().gate_config())
        .unwrap();
    let prompts = vec!["eins".to_string(), "kaputt".to_string(), "drei".to_string()];
    let eintraege = strategyos_cli::generieren_stapel(&gate, prompts).await;

    assert!(!strategyos_cli::alle_fehlgeschlagen(&eintraege));
    let json = serde_json::to_value(&eintraege).unwrap();
    assert_eq!(json[0]["text"], "Entwurf zu eins");
    assert!(json[1]["fehler"].as_str().unwrap().contains("401"));
    assert!(json[1].get("text").is_none());
    assert_eq!(json[2]["text"], "Entwurf zu drei");
}

#[tokio::test]
async fn stapel_nur_fehler() {
    let gate = QualityGate::new(Arc::new(WaehlerischerGenerator), AppConfig::default().gate_config())
        .unwrap();
    let eintraege =
        strategyos_cli::generieren_stapel(&gate, vec!["kaputt a".into(), "kaputt b".into()]).await;

    assert_eq!(eintraege.len(), 2);
    assert!(strategyos_cli::alle_fehlgeschlagen(&eintraege));
}
