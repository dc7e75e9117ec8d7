//! StrategyOS Kommandozeile – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und fuehrt den
//! gewaehlten Befehl aus. Ergebnisse gehen nach stdout, Logs nach stderr.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use strategyos_cli::config::{AppConfig, ConfigQuelle, ENV_API_SCHLUESSEL, ENV_CONFIG};
use strategyos_gate::{GeminiGenerator, QualityGate};
use strategyos_observability::logging_initialisieren;

/// StrategyOS: Audio-Codec und Quality-Gate fuer generierte Texte
#[derive(Parser, Debug)]
#[command(name = "strategyos", author, version, about, long_about = None)]
struct Cli {
    /// Pfad zur TOML-Konfiguration (sonst STRATEGYOS_CONFIG bzw. strategyos.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    befehl: Befehl,
}

#[derive(Subcommand, Debug)]
enum Befehl {
    /// Prueft Text gegen die Constraints, Exit-Code 1 wenn ungueltig
    Pruefen(Eingabe),

    /// Wendet den Lexikon-Filter an
    Filtern(Eingabe),

    /// Normalisiert eine JSON-Antwort zu einem Entwurf und prueft ihn
    Entwurf(Eingabe),

    /// Erzeugt Text ueber das Quality-Gate
    Generieren {
        /// Basis-Prompt, mehrfach angegeben laufen die Prompts parallel
        #[arg(short, long, required = true)]
        prompt: Vec<String>,
    },

    /// Misst Laenge und RMS-Pegel eines Base64-Wire-Frames
    Pegel(Eingabe),
}

/// Eingabe aus Datei oder stdin
#[derive(clap::Args, Debug)]
struct Eingabe {
    /// Eingabedatei, ohne Angabe wird stdin gelesen
    datei: Option<PathBuf>,
}

impl Eingabe {
    fn lesen(&self) -> Result<String> {
        match &self.datei {
            Some(pfad) => std::fs::read_to_string(pfad)
                .with_context(|| format!("Eingabedatei '{}' nicht lesbar", pfad.display())),
            None => {
                let mut inhalt = String::new();
                std::io::stdin()
                    .read_to_string(&mut inhalt)
                    .context("stdin nicht lesbar")?;
                Ok(inhalt)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_pfad = AppConfig::pfad_aufloesen(cli.config.clone(), std::env::var(ENV_CONFIG).ok());
    let (config, quelle) = AppConfig::laden(&config_pfad)?;
    config.validieren()?;

    logging_initialisieren(&config.logging.level, &config.logging.format)?;

    if quelle == ConfigQuelle::Standardwerte {
        tracing::warn!(
            pfad = %config_pfad,
            "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
        );
    }

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "StrategyOS initialisiert"
    );

    ausfuehren(cli.befehl, &config).await
}

async fn ausfuehren(befehl: Befehl, config: &AppConfig) -> Result<ExitCode> {
    match befehl {
        Befehl::Pruefen(eingabe) => {
            let ergebnis = strategyos_cli::pruefen(&eingabe.lesen()?);
            println!("{}", serde_json::to_string_pretty(&ergebnis)?);
            Ok(if ergebnis.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Befehl::Filtern(eingabe) => {
            println!("{}", strategyos_cli::filtern(&eingabe.lesen()?));
            Ok(ExitCode::SUCCESS)
        }

        Befehl::Entwurf(eingabe) => {
            let bericht = strategyos_cli::entwurf(&eingabe.lesen()?)?;
            println!("{}", serde_json::to_string_pretty(&bericht)?);
            Ok(ExitCode::SUCCESS)
        }

        Befehl::Generieren { prompt } => {
            let gemini = config.gemini_config(std::env::var(ENV_API_SCHLUESSEL).ok())?;
            let generator = Arc::new(GeminiGenerator::new(gemini)?);
            let gate = QualityGate::new(generator, config.gate_config())?;

            if let [einzeln] = prompt.as_slice() {
                let outcome = strategyos_cli::generieren(&gate, einzeln).await?;
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(ExitCode::SUCCESS);
            }

            let eintraege = strategyos_cli::generieren_stapel(&gate, prompt).await;
            println!("{}", serde_json::to_string_pretty(&eintraege)?);
            Ok(if strategyos_cli::alle_fehlgeschlagen(&eintraege) {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }

        Befehl::Pegel(eingabe) => {
            let eingabe = eingabe.lesen()?;
            if eingabe.trim().is_empty() {
                bail!("Leere Eingabe, erwartet Base64-Frame oder MediaChunk-JSON");
            }
            let bericht = strategyos_cli::pegel(
                &eingabe,
                config.audio.playback_rate,
                config.audio.sprech_schwelle,
            )?;
            println!("{}", serde_json::to_string_pretty(&bericht)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
