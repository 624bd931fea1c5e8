//! Boundary errors.
//!
//! Only configuration and host-facing setup can fail. The classification path
//! itself never returns an error: an unreadable style or a vanished node is
//! simply "no action".

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config format: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid site pattern `{pattern}`: {source}")]
    SitePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid tag name `{tag}` in [tags.{set}]")]
    TagName { set: &'static str, tag: String },

    #[error("reactor.max_turns_per_pump must be at least 1")]
    ZeroPumpTurns,
}

pub type Result<T> = std::result::Result<T, EngineError>;
