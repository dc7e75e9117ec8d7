//! HTTP-Generator gegen die `generateContent` REST-API
//!
//! Fehlerabbildung:
//! - HTTP 429 oder Status `RESOURCE_EXHAUSTED` -> `RateLimit`
//! - 5xx, Timeout, Verbindungsfehler -> `NichtVerfuegbar`
//! - alles andere -> `Anfrage`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use strategyos_core::ModelId;
use tracing::debug;

use crate::error::{GateError, GateResult, GeneratorError};
use crate::generator::TextGenerator;

/// Standard-Basis-URL der API
pub const STANDARD_BASIS_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Verbindungsdaten fuer den Generator
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_schluessel: String,
    pub basis_url: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_schluessel: impl Into<String>) -> Self {
        Self {
            api_schluessel: api_schluessel.into(),
            basis_url: STANDARD_BASIS_URL.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// `TextGenerator` ueber HTTP
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> GateResult<Self> {
        if config.api_schluessel.trim().is_empty() {
            return Err(GateError::Konfiguration("API-Schluessel fehlt".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GateError::Konfiguration(format!("HTTP-Client: {e}")))?;
        Ok(Self { client, config })
    }

    fn url(&self, model: &ModelId) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.basis_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
        model: &ModelId,
    ) -> Result<String, GeneratorError> {
        let antwort = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", &self.config.api_schluessel)
            .json(&anfrage_body(system_instruction, prompt))
            .send()
            .await
            .map_err(transportfehler)?;

        let status = antwort.status();
        let body = antwort.text().await.map_err(transportfehler)?;
        debug!(modell = %model, status = status.as_u16(), bytes = body.len(), "Generator-Antwort");

        if !status.is_success() {
            return Err(statusfehler(status, &body, model));
        }

        let wert: Value = serde_json::from_str(&body)
            .map_err(|e| GeneratorError::Anfrage(format!("Antwort kein JSON: {e}")))?;
        antwort_text(&wert)
    }
}

/// Baut den Request-Body; leere System-Anweisung wird weggelassen
pub fn anfrage_body(system_instruction: &str, prompt: &str) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
    });
    if !system_instruction.trim().is_empty() {
        body["systemInstruction"] = json!({ "parts": [{ "text": system_instruction }] });
    }
    body
}

/// Verbindet alle Text-Parts des ersten Kandidaten
pub fn antwort_text(wert: &Value) -> Result<String, GeneratorError> {
    let parts = wert
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| GeneratorError::Anfrage("Antwort ohne Kandidaten".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(GeneratorError::Anfrage("Antwort ohne Text".into()));
    }
    Ok(text)
}

/// Klassifiziert eine Nicht-2xx-Antwort
pub fn statusfehler(status: StatusCode, body: &str, model: &ModelId) -> GeneratorError {
    let api_status = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/status").and_then(Value::as_str).map(str::to_string));

    let nachricht = format!("HTTP {}: {}", status.as_u16(), body.chars().take(200).collect::<String>());

    if status == StatusCode::TOO_MANY_REQUESTS || api_status.as_deref() == Some("RESOURCE_EXHAUSTED") {
        GeneratorError::RateLimit {
            modell: model.clone(),
            nachricht,
        }
    } else if status.is_server_error() {
        GeneratorError::NichtVerfuegbar(nachricht)
    } else {
        GeneratorError::Anfrage(nachricht)
    }
}

fn transportfehler(e: reqwest::Error) -> GeneratorError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        GeneratorError::NichtVerfuegbar(e.to_string())
    } else {
        GeneratorError::Anfrage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_mit_system_anweisung() {
        let body = anfrage_body("Sei knapp.", "Schreib einen Post");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Schreib einen Post");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Sei knapp.");
    }

    #[test]
    fn body_ohne_system_anweisung() {
        let body = anfrage_body("  ", "p");
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn text_aus_parts() {
        let wert = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hallo " }, { "text": "Welt" }] } }]
        });
        assert_eq!(antwort_text(&wert).unwrap(), "Hallo Welt");
    }

    #[test]
    fn antwort_ohne_kandidaten() {
        assert!(matches!(
            antwort_text(&json!({"promptFeedback": {}})),
            Err(GeneratorError::Anfrage(_))
        ));
    }

    #[test]
    fn status_klassifizierung() {
        let m = ModelId::new("gemini-2.5-pro");
        assert!(statusfehler(StatusCode::TOO_MANY_REQUESTS, "", &m).ist_rate_limit());
        assert!(statusfehler(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#,
            &m
        )
        .ist_rate_limit());
        assert!(matches!(
            statusfehler(StatusCode::SERVICE_UNAVAILABLE, "", &m),
            GeneratorError::NichtVerfuegbar(_)
        ));
        assert!(matches!(
            statusfehler(StatusCode::UNAUTHORIZED, "", &m),
            GeneratorError::Anfrage(_)
        ));
    }

    #[test]
    fn ohne_schluessel_kein_generator() {
        assert!(GeminiGenerator::new(GeminiConfig::new("")).is_err());
    }

    #[test]
    fn url_aufbau() {
        let mut config = GeminiConfig::new("k");
        config.basis_url = "http://localhost:9000/v1beta/".into();
        let gen = GeminiGenerator::new(config).unwrap();
        assert_eq!(
            gen.url(&"gemini-2.5-flash".into()),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
