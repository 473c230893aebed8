//! Error taxonomy for the pattern engine.
//!
//! Every variant is recoverable: callers log it and fall back to a default
//! presentation, an empty history, or an empty render.

use thiserror::Error;

/// Errors produced by the pattern engine and its codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A shared config string could not be decoded or parsed.
    #[error("Malformed config string: {0}")]
    MalformedConfig(String),

    /// Persisted history could not be read back.
    #[error("Error on history recovery: {0}")]
    HistoryRecovery(String),

    /// A layout was requested for a pattern with no glyphs.
    #[error("Pattern has no glyphs")]
    EmptyPattern,

    /// A character pack has no glyphs to sample from.
    #[error("Character pack {0} has no glyphs")]
    EmptyPack(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
