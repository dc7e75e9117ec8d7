//! strategyos-cli – Bibliotheks-Root
//!
//! Die Befehle der Kommandozeile als testbare Funktionen. `main.rs`
//! kuemmert sich nur um Argumente, Ein- und Ausgabe.

pub mod config;

use anyhow::{Context, Result};
use serde::Serialize;
use strategyos_audio::{base64_to_float32, parse_media_chunk, rms_volume};
use strategyos_gate::{
    filter_text, normalize_draft_text, verify_constraints, ConstraintResult, Draft,
    GenerationOutcome, QualityGate,
};

/// Ergebnis von `pruefen`
pub fn pruefen(text: &str) -> ConstraintResult {
    verify_constraints(text)
}

/// Ergebnis von `filtern`
pub fn filtern(text: &str) -> String {
    filter_text(text)
}

/// Normalisierter Entwurf samt Pruefergebnis seines Inhalts
#[derive(Debug, Clone, Serialize)]
pub struct EntwurfBericht {
    pub entwurf: Draft,
    pub pruefung: ConstraintResult,
}

/// Normalisiert eine lose Generator-Antwort und prueft den Inhalt
pub fn entwurf(roh: &str) -> Result<EntwurfBericht> {
    let entwurf = normalize_draft_text(roh.trim())?;
    let pruefung = verify_constraints(&entwurf.inhalt);
    Ok(EntwurfBericht { entwurf, pruefung })
}

/// Ergebnis von `pegel`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PegelBericht {
    pub samples: usize,
    pub sample_rate: u32,
    pub dauer_ms: u64,
    pub rms: f32,
    pub spricht: bool,
}

/// Misst einen Wire-Frame: roher Base64-Text oder `MediaChunk`-JSON.
///
/// Die Rate aus dem MIME-Typ des Chunks hat Vorrang vor `standard_rate`.
pub fn pegel(eingabe: &str, standard_rate: u32, sprech_schwelle: f32) -> Result<PegelBericht> {
    let eingabe = eingabe.trim();
    let (samples, sample_rate) = if eingabe.starts_with('{') {
        let chunk = parse_media_chunk(eingabe).context("Kein gueltiger MediaChunk")?;
        let rate = chunk.sample_rate().unwrap_or(standard_rate);
        (chunk.zu_samples()?, rate)
    } else {
        (
            base64_to_float32(eingabe).context("Kein gueltiger Base64-Frame")?,
            standard_rate,
        )
    };

    let rms = rms_volume(&samples);
    let dauer_ms = if sample_rate == 0 {
        0
    } else {
        samples.len() as u64 * 1000 / u64::from(sample_rate)
    };
    Ok(PegelBericht {
        samples: samples.len(),
        sample_rate,
        dauer_ms,
        rms,
        spricht: rms > sprech_schwelle,
    })
}

/// Fuehrt einen Quality-Gate-Lauf aus und meldet erschoepfte Laeufe
pub async fn generieren(gate: &QualityGate, prompt: &str) -> Result<GenerationOutcome> {
    let outcome = gate.generieren(prompt).await?;
    if !outcome.ist_bestanden() {
        tracing::warn!(
            versuche = outcome.versuche,
            grund = outcome.grund.as_deref().unwrap_or_default(),
            "Kein Entwurf hat alle Pruefungen bestanden, zeige den letzten"
        );
    }
    Ok(outcome)
}

/// Ein Eintrag der Stapel-Ausgabe: Ergebnis oder Fehlermeldung
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StapelEintrag {
    Ergebnis(GenerationOutcome),
    Fehler { fehler: String },
}

/// Fuehrt mehrere Prompts parallel aus, ein Eintrag pro Prompt in Eingabereihenfolge.
///
/// Ein fehlgeschlagener Prompt verdraengt die Ergebnisse der anderen nicht.
pub async fn generieren_stapel(gate: &QualityGate, prompts: Vec<String>) -> Vec<StapelEintrag> {
    gate.stapel(prompts)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, ergebnis)| match ergebnis {
            Ok(outcome) => {
                if !outcome.ist_bestanden() {
                    tracing::warn!(
                        prompt = index,
                        versuche = outcome.versuche,
                        "Kein Entwurf hat alle Pruefungen bestanden, zeige den letzten"
                    );
                }
                StapelEintrag::Ergebnis(outcome)
            }
            Err(e) => {
                tracing::warn!(prompt = index, "Generierung fehlgeschlagen: {}", e);
                StapelEintrag::Fehler {
                    fehler: e.to_string(),
                }
            }
        })
        .collect()
}

/// Wahr wenn kein Prompt des Stapels ein Ergebnis geliefert hat
pub fn alle_fehlgeschlagen(eintraege: &[StapelEintrag]) -> bool {
    eintraege
        .iter()
        .all(|e| matches!(e, StapelEintrag::Fehler { .. }))
}
