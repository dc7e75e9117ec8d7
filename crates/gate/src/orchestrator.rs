//! Begrenzte Regenerierung mit wachsendem Prompt
//!
//! Als kleine Zustandsmaschine umgesetzt:
//!
//! ```text
//! Versuch(n) -> Pruefen(n) -> Akzeptiert
//!                          -> Korrigieren -> Versuch(n+1)   (n < max)
//!                          -> Erschoepft                    (n == max)
//! ```
//!
//! Jeder Uebergang nach `Versuch` erhoeht `n`, damit ist die Schleife
//! nach hoechstens `max_versuche` Generator-Aufrufen (plus je einem
//! Fallback bei Rate-Limit) beendet. Versuche laufen strikt nacheinander.
//!
//! Ein erschoepfter Lauf ist kein Fehler: der letzte Kandidat wird mit
//! Grund zurueckgegeben, damit das UI ihn mit Warnung anzeigen kann.

use std::sync::Arc;

use serde::Serialize;
use strategyos_core::{ModelId, RequestId};
use tokio::task::JoinSet;
use tracing::{debug, info_span, warn, Instrument};

use crate::constraints::{verify_constraints_mit, ConstraintResult};
use crate::error::{GateError, GateResult, GeneratorError};
use crate::generator::{generate_mit_fallback, Generiert, ModelRoute, TextGenerator};
use crate::lexicon::Lexikon;

/// Standard-Versuchsbudget
pub const STANDARD_MAX_VERSUCHE: u32 = 3;

/// Konfiguration des Quality-Gates
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Maximale Anzahl Generieren-und-Pruefen-Zyklen (>= 1)
    pub max_versuche: u32,
    /// Primaer- und Fallback-Modell
    pub route: ModelRoute,
    /// System-Anweisung fuer jeden Generator-Aufruf
    pub system_anweisung: String,
    /// Kandidaten vor der Pruefung durch den Lexikon-Filter schicken
    pub auto_korrektur: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_versuche: STANDARD_MAX_VERSUCHE,
            route: ModelRoute::default(),
            system_anweisung: String::new(),
            auto_korrektur: true,
        }
    }
}

impl GateConfig {
    pub fn validieren(&self) -> GateResult<()> {
        if self.max_versuche == 0 {
            return Err(GateError::Konfiguration(
                "max_versuche muss mindestens 1 sein".into(),
            ));
        }
        Ok(())
    }
}

/// Endzustand eines Laufs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// Kandidat hat alle Constraints bestanden
    Akzeptiert,
    /// Budget aufgebraucht, letzter Kandidat wird trotzdem geliefert
    Erschoepft,
}

/// Ergebnis eines Laufs, auch im erschoepften Fall mit Text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub text: String,
    pub status: GateStatus,
    /// Grund des letzten Verstosses bzw. Generator-Fehlers (nur bei `Erschoepft`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grund: Option<String>,
    /// Anzahl durchgefuehrter Versuche
    pub versuche: u32,
    /// Modell, das den zurueckgegebenen Text geliefert hat
    pub modell: ModelId,
}

impl GenerationOutcome {
    pub fn ist_bestanden(&self) -> bool {
        self.status == GateStatus::Akzeptiert
    }
}

/// Zustaende der Regenerierungs-Schleife
enum Schritt {
    Versuch { nr: u32, prompt: String },
    Pruefen { nr: u32, prompt: String, kandidat: Generiert },
    Fertig(GenerationOutcome),
}

/// Quality-Gate um einen externen Generator
#[derive(Clone)]
pub struct QualityGate {
    generator: Arc<dyn TextGenerator>,
    config: GateConfig,
}

impl QualityGate {
    pub fn new(generator: Arc<dyn TextGenerator>, config: GateConfig) -> GateResult<Self> {
        config.validieren()?;
        Ok(Self { generator, config })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Fuehrt einen vollstaendigen Lauf fuer einen Basis-Prompt aus
    pub async fn generieren(&self, basis_prompt: &str) -> GateResult<GenerationOutcome> {
        let request_id = RequestId::new();
        let span = info_span!("quality_gate", request = %request_id);
        self.ablauf(basis_prompt).instrument(span).await
    }

    /// Fuehrt unabhaengige Laeufe parallel aus, Ergebnisse in Eingabereihenfolge
    pub async fn stapel(&self, prompts: Vec<String>) -> Vec<GateResult<GenerationOutcome>> {
        let anzahl = prompts.len();
        let mut tasks = JoinSet::new();
        for (index, prompt) in prompts.into_iter().enumerate() {
            let gate = self.clone();
            tasks.spawn(async move { (index, gate.generieren(&prompt).await) });
        }

        let mut ergebnisse: Vec<Option<GateResult<GenerationOutcome>>> =
            (0..anzahl).map(|_| None).collect();
        while let Some(beendet) = tasks.join_next().await {
            match beendet {
                Ok((index, ergebnis)) => ergebnisse[index] = Some(ergebnis),
                Err(e) => warn!("Stapel-Task abgebrochen: {}", e),
            }
        }

        ergebnisse
            .into_iter()
            .map(|e| e.unwrap_or_else(|| Err(GateError::Task("Task ohne Ergebnis beendet".into()))))
            .collect()
    }

    fn pruefen(&self, text: &str) -> (String, ConstraintResult) {
        let text = if self.config.auto_korrektur {
            Lexikon::standard().filtern(text)
        } else {
            text.to_string()
        };
        let ergebnis = verify_constraints_mit(&text, Lexikon::standard());
        (text, ergebnis)
    }

    async fn ablauf(&self, basis_prompt: &str) -> GateResult<GenerationOutcome> {
        let max = self.config.max_versuche;
        // Letzter abgelehnter Kandidat mit Grund
        let mut letzter: Option<(Generiert, String)> = None;
        let mut schritt = Schritt::Versuch {
            nr: 1,
            prompt: basis_prompt.to_string(),
        };

        loop {
            schritt = match schritt {
                Schritt::Versuch { nr, prompt } => {
                    match generate_mit_fallback(
                        self.generator.as_ref(),
                        &self.config.system_anweisung,
                        &prompt,
                        &self.config.route,
                    )
                    .await
                    {
                        Ok(kandidat) => Schritt::Pruefen {
                            nr,
                            prompt,
                            kandidat,
                        },
                        Err(e @ GeneratorError::Anfrage(_)) => return Err(e.into()),
                        Err(e) => {
                            warn!(versuch = nr, "Generator-Aufruf fehlgeschlagen: {}", e);
                            if nr < max {
                                Schritt::Versuch { nr: nr + 1, prompt }
                            } else {
                                match letzter.take() {
                                    Some((kandidat, grund)) => {
                                        Schritt::Fertig(erschoepft(kandidat, grund, nr))
                                    }
                                    None => return Err(e.into()),
                                }
                            }
                        }
                    }
                }

                Schritt::Pruefen {
                    nr,
                    prompt,
                    kandidat,
                } => {
                    let (text, ergebnis) = self.pruefen(&kandidat.text);
                    let kandidat = Generiert {
                        text,
                        modell: kandidat.modell,
                    };
                    debug!(
                        versuch = nr,
                        modell = %kandidat.modell,
                        valid = ergebnis.valid,
                        "Kandidat geprueft"
                    );

                    match ergebnis.reason {
                        None => Schritt::Fertig(GenerationOutcome {
                            text: kandidat.text,
                            status: GateStatus::Akzeptiert,
                            grund: None,
                            versuche: nr,
                            modell: kandidat.modell,
                        }),
                        Some(grund) if nr >= max => Schritt::Fertig(erschoepft(kandidat, grund, nr)),
                        Some(grund) => {
                            let prompt = korrektur_anhaengen(prompt, &grund);
                            letzter = Some((kandidat, grund));
                            Schritt::Versuch {
                                nr: nr + 1,
                                prompt,
                            }
                        }
                    }
                }

                Schritt::Fertig(outcome) => {
                    if !outcome.ist_bestanden() {
                        warn!(
                            versuche = outcome.versuche,
                            grund = outcome.grund.as_deref().unwrap_or_default(),
                            "Versuchsbudget erschoepft, liefere letzten Kandidaten"
                        );
                    }
                    return Ok(outcome);
                }
            };
        }
    }
}

fn erschoepft(kandidat: Generiert, grund: String, versuche: u32) -> GenerationOutcome {
    GenerationOutcome {
        text: kandidat.text,
        status: GateStatus::Erschoepft,
        grund: Some(grund),
        versuche,
        modell: kandidat.modell,
    }
}

/// Haengt die Korrektur-Anweisung fuer den naechsten Versuch an
pub fn korrektur_anhaengen(mut prompt: String, grund: &str) -> String {
    prompt.push_str(&format!(
        "\n\nCRITICAL CORRECTION: Your previous draft failed validation: {grund}. Rewrite it so that it passes."
    ));
    prompt
}
