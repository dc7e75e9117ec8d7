//! # strategyos-observability
//!
//! Structured Logging via tracing-subscriber (Text oder JSON auf stderr).
//! stdout bleibt fuer Nutzdaten der CLI frei.

pub mod logging;

pub use logging::{
    log_format_gueltig, log_level_gueltig, logging_initialisieren, LogEinstellungen, LogFormat,
    LoggingError,
};
