//! Normalisierung loser Generator-Antworten
//!
//! Modelle liefern dasselbe logische Feld unter wechselnden Schluesseln.
//! Diese Toleranz lebt ausschliesslich hier: aus einem beliebigen
//! JSON-Wert wird ein strikter `Draft`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GateError, GateResult};

const INHALT_SCHLUESSEL: &[&str] = &["content", "text", "post", "body", "draft", "output"];
const HOOK_SCHLUESSEL: &[&str] = &["hook", "headline", "title"];
const HASHTAG_SCHLUESSEL: &[&str] = &["hashtags", "tags"];
const HUELLEN_SCHLUESSEL: &[&str] = &["result", "data"];

/// Strikter interner Entwurf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub inhalt: String,
    pub hook: Option<String>,
    pub hashtags: Vec<String>,
}

/// Bildet einen losen JSON-Wert auf einen `Draft` ab
pub fn normalize_draft(wert: Value) -> GateResult<Draft> {
    match wert {
        Value::String(inhalt) if !inhalt.trim().is_empty() => Ok(Draft {
            inhalt,
            hook: None,
            hashtags: Vec::new(),
        }),
        Value::Object(objekt) => aus_objekt(huelle_entfernen(objekt)),
        anderes => Err(GateError::Normalisierung(format!(
            "Erwartet Objekt oder Text, erhalten: {}",
            typ_name(&anderes)
        ))),
    }
}

/// Parst rohen Text als JSON und normalisiert; kein JSON -> reiner Inhalt
pub fn normalize_draft_text(roh: &str) -> GateResult<Draft> {
    match serde_json::from_str::<Value>(roh) {
        Ok(wert) => normalize_draft(wert),
        Err(_) => normalize_draft(Value::String(roh.to_string())),
    }
}

fn huelle_entfernen(mut objekt: Map<String, Value>) -> Map<String, Value> {
    if finde_text(&objekt, INHALT_SCHLUESSEL).is_some() {
        return objekt;
    }
    for schluessel in HUELLEN_SCHLUESSEL {
        if matches!(objekt.get(*schluessel), Some(Value::Object(_))) {
            if let Some(Value::Object(innen)) = objekt.remove(*schluessel) {
                return innen;
            }
        }
    }
    objekt
}

fn aus_objekt(objekt: Map<String, Value>) -> GateResult<Draft> {
    let inhalt = finde_text(&objekt, INHALT_SCHLUESSEL).ok_or_else(|| {
        GateError::Normalisierung(format!(
            "Kein Inhaltsfeld gefunden (erwartet eines von {INHALT_SCHLUESSEL:?})"
        ))
    })?;

    let hook = finde_text(&objekt, HOOK_SCHLUESSEL);
    let hashtags = HASHTAG_SCHLUESSEL
        .iter()
        .find_map(|s| objekt.get(*s))
        .map(hashtags_lesen)
        .unwrap_or_default();

    Ok(Draft {
        inhalt,
        hook,
        hashtags,
    })
}

fn finde_text(objekt: &Map<String, Value>, schluessel: &[&str]) -> Option<String> {
    schluessel.iter().find_map(|s| match objekt.get(*s) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    })
}

fn hashtags_lesen(wert: &Value) -> Vec<String> {
    let roh: Vec<String> = match wert {
        Value::Array(eintraege) => eintraege
            .iter()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        Value::String(text) => text
            .split(|c: char| c.is_whitespace() || c == ',')
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    roh.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty() && tag != "#")
        .map(|tag| {
            if tag.starts_with('#') {
                tag
            } else {
                format!("#{tag}")
            }
        })
        .collect()
}

fn typ_name(wert: &Value) -> &'static str {
    match wert {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "Zahl",
        Value::String(_) => "leerer Text",
        Value::Array(_) => "Array",
        Value::Object(_) => "Objekt",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alternative_schluessel() {
        for schluessel in INHALT_SCHLUESSEL {
            let mut objekt = Map::new();
            objekt.insert(schluessel.to_string(), json!("Inhalt"));
            let draft = normalize_draft(Value::Object(objekt)).unwrap();
            assert_eq!(draft.inhalt, "Inhalt");
        }
    }

    #[test]
    fn hook_und_hashtags() {
        let draft = normalize_draft(json!({
            "post": "Text",
            "headline": "Hook",
            "tags": ["rust", "#ai", " "]
        }))
        .unwrap();
        assert_eq!(draft.hook.as_deref(), Some("Hook"));
        assert_eq!(draft.hashtags, vec!["#rust", "#ai"]);
    }

    #[test]
    fn hashtags_als_text() {
        let draft = normalize_draft(json!({"text": "x", "hashtags": "rust, #tokio  serde"})).unwrap();
        assert_eq!(draft.hashtags, vec!["#rust", "#tokio", "#serde"]);
    }

    #[test]
    fn huelle_wird_entfernt() {
        let draft = normalize_draft(json!({"result": {"body": "innen", "title": "T"}})).unwrap();
        assert_eq!(draft.inhalt, "innen");
        assert_eq!(draft.hook.as_deref(), Some("T"));
    }

    #[test]
    fn reiner_text() {
        assert_eq!(normalize_draft(json!("nur Text")).unwrap().inhalt, "nur Text");
        assert_eq!(normalize_draft_text("kein { json").unwrap().inhalt, "kein { json");
        assert_eq!(
            normalize_draft_text(r#"{"draft": "aus json"}"#).unwrap().inhalt,
            "aus json"
        );
    }

    #[test]
    fn fehlender_inhalt() {
        assert!(matches!(
            normalize_draft(json!({"hook": "nur hook"})),
            Err(GateError::Normalisierung(_))
        ));
        assert!(normalize_draft(json!(42)).is_err());
        assert!(normalize_draft(json!("   ")).is_err());
    }
}
