//! Vertrag fuer den externen Text-Generator und Modell-Fallback
//!
//! Der Generator ist ein opaker asynchroner Aufruf
//! `(system_instruction, prompt, modell) -> text`. Rate-Limits loesen
//! genau einen Versuch mit dem Fallback-Modell aus, alle anderen Fehler
//! gehen unveraendert an den Aufrufer.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strategyos_core::ModelId;
use tracing::{debug, warn};

use crate::error::GeneratorError;

/// Externe Faehigkeit: Text aus Prompt erzeugen
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
        model: &ModelId,
    ) -> Result<String, GeneratorError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
        model: &ModelId,
    ) -> Result<String, GeneratorError> {
        (**self).generate(system_instruction, prompt, model).await
    }
}

/// Primaeres Modell und Ausweichmodell bei Rate-Limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRoute {
    pub primaer: ModelId,
    pub fallback: ModelId,
}

impl Default for ModelRoute {
    fn default() -> Self {
        Self {
            primaer: ModelId::new("gemini-2.5-pro"),
            fallback: ModelId::new("gemini-2.5-flash"),
        }
    }
}

/// Generierter Text und das Modell, das ihn geliefert hat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generiert {
    pub text: String,
    pub modell: ModelId,
}

/// Ruft das primaere Modell, bei Rate-Limit einmal das Fallback-Modell
pub async fn generate_mit_fallback<G: TextGenerator + ?Sized>(
    generator: &G,
    system_instruction: &str,
    prompt: &str,
    route: &ModelRoute,
) -> Result<Generiert, GeneratorError> {
    match generator
        .generate(system_instruction, prompt, &route.primaer)
        .await
    {
        Ok(text) => Ok(Generiert {
            text,
            modell: route.primaer.clone(),
        }),
        Err(e) if e.ist_rate_limit() => {
            warn!(
                primaer = %route.primaer,
                fallback = %route.fallback,
                "Rate-Limit, wechsle auf Fallback-Modell"
            );
            let text = generator
                .generate(system_instruction, prompt, &route.fallback)
                .await?;
            debug!(modell = %route.fallback, "Fallback-Modell hat geliefert");
            Ok(Generiert {
                text,
                modell: route.fallback.clone(),
            })
        }
        Err(e) => Err(e),
    }
}
