//! strategyos-gate – Generation Quality Gate
//!
//! Deterministische Huelle um einen opaken Text-Generator:
//! - Constraint-Pruefung (leer, Hook-Laenge, verbotene Begriffe)
//! - Lexikon-Filter mit Ersetzung und Umbruch-Normalisierung
//! - Modell-Fallback bei Rate-Limit
//! - Begrenzte Regenerierung mit Korrektur-Prompt
//! - Normalisierung loser JSON-Antworten
//! - HTTP-Generator fuer die `generateContent` API

pub mod constraints;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod lexicon;
pub mod normalize;
pub mod orchestrator;

// Bequeme Re-Exporte der wichtigsten Typen
pub use constraints::{hook_laenge, verify_constraints, ConstraintResult, MAX_HOOK_ZEICHEN};
pub use error::{GateError, GateResult, GeneratorError};
pub use gemini::{GeminiConfig, GeminiGenerator};
pub use generator::{generate_mit_fallback, Generiert, ModelRoute, TextGenerator};
pub use lexicon::{filter_text, finde_verbotenes_wort, Lexikon};
pub use normalize::{normalize_draft, normalize_draft_text, Draft};
pub use orchestrator::{
    GateConfig, GateStatus, GenerationOutcome, QualityGate, STANDARD_MAX_VERSUCHE,
};
