//! Deterministische Constraint-Pruefung fuer generierten Text
//!
//! Regeln in fester Reihenfolge, der erste Verstoss gewinnt:
//! 1. Text nicht leer
//! 2. Hook (erste zwei nicht-leere Zeilen) hoechstens 210 Zeichen
//! 3. Kein verbotener Begriff aus dem Lexikon

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexikon;

/// Maximale Zeichenanzahl des Hooks (inklusive)
pub const MAX_HOOK_ZEICHEN: usize = 210;

/// Ergebnis einer Constraint-Pruefung
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

impl ConstraintResult {
    pub fn gueltig() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn ungueltig(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Prueft Text gegen das Standard-Lexikon
pub fn verify_constraints(text: &str) -> ConstraintResult {
    verify_constraints_mit(text, Lexikon::standard())
}

/// Prueft Text gegen ein beliebiges Lexikon
pub fn verify_constraints_mit(text: &str, lexikon: &Lexikon) -> ConstraintResult {
    if text.trim().is_empty() {
        return ConstraintResult::ungueltig("Empty text");
    }

    let hook = hook_laenge(text);
    if hook > MAX_HOOK_ZEICHEN {
        return ConstraintResult::ungueltig(format!(
            "Hook is too long ({hook} chars). Must be under {MAX_HOOK_ZEICHEN} characters."
        ));
    }

    if let Some(wort) = lexikon.finde_verbotenes_wort(text) {
        return ConstraintResult::ungueltig(format!("Contains banned word: \"{wort}\""));
    }

    ConstraintResult::gueltig()
}

/// Zeichenanzahl der ersten zwei nicht-leeren Zeilen
///
/// Leere Zeilen werden vor dem Zaehlen entfernt, nicht nur uebersprungen.
pub fn hook_laenge(text: &str) -> usize {
    text.lines()
        .filter(|zeile| !zeile.trim().is_empty())
        .take(2)
        .map(|zeile| zeile.chars().count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leerer_text() {
        assert_eq!(verify_constraints(""), ConstraintResult::ungueltig("Empty text"));
        assert_eq!(
            verify_constraints("  \n\t \n"),
            ConstraintResult::ungueltig("Empty text")
        );
    }

    #[test]
    fn hook_grenze_inklusive() {
        let text = format!("{}\n{}\nRest", "a".repeat(100), "b".repeat(110));
        assert!(verify_constraints(&text).valid);

        let text = format!("{}\n{}\nRest", "a".repeat(100), "b".repeat(111));
        let ergebnis = verify_constraints(&text);
        assert!(!ergebnis.valid);
        let grund = ergebnis.reason.unwrap();
        assert!(grund.contains("too long"));
        assert!(grund.contains("211"));
    }

    #[test]
    fn leerzeilen_zaehlen_nicht() {
        let text = format!("{}\n\n   \n\n{}\n{}", "a".repeat(105), "b".repeat(105), "c".repeat(300));
        assert_eq!(hook_laenge(&text), 210);
        assert!(verify_constraints(&text).valid);
    }

    #[test]
    fn einzelne_zeile() {
        assert_eq!(hook_laenge("nur eine Zeile"), 14);
        assert!(!verify_constraints(&"x".repeat(211)).valid);
        assert!(verify_constraints(&"x".repeat(210)).valid);
    }

    #[test]
    fn zeichen_nicht_bytes() {
        // 'ü' ist 2 Bytes, zaehlt aber als ein Zeichen
        let text = "ü".repeat(210);
        assert!(verify_constraints(&text).valid);
    }

    #[test]
    fn verbotenes_wort() {
        let ergebnis = verify_constraints("This is crucial.\nReally.");
        assert!(!ergebnis.valid);
        assert!(ergebnis.reason.unwrap().contains("crucial"));
    }

    #[test]
    fn teilwort_ist_erlaubt() {
        assert!(verify_constraints("A crucial-sounding claim.\nFine.").valid);
    }

    #[test]
    fn hook_vor_lexikon() {
        let text = format!("{} crucial", "a".repeat(220));
        let grund = verify_constraints(&text).reason.unwrap();
        assert!(grund.contains("too long"));
    }

    #[test]
    fn serialisierung() {
        let json = serde_json::to_string(&ConstraintResult::gueltig()).unwrap();
        assert_eq!(json, r#"{"valid":true}"#);
        let json = serde_json::to_string(&ConstraintResult::ungueltig("Empty text")).unwrap();
        assert_eq!(json, r#"{"valid":false,"reason":"Empty text"}"#);
    }
}
