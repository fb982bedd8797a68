use std::fmt;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `psychsim`.
///
/// Covers the application shell. The session core reports failures as
/// [`GenerationError`] notices and never bubbles them up to this level.
/// Application glue continues to use `anyhow::Result` for context chains.
#[derive(Debug, Error)]
pub enum PsychError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generation errors ──────────────────────────────────────────────────────

/// Which of the two generation calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    Scenario,
    Reveal,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scenario => f.write_str("scenario"),
            Self::Reveal => f.write_str("reveal"),
        }
    }
}

/// The single failure kind of the simulation core.
///
/// Network failures, HTTP error statuses, a missing API key and payloads
/// that do not match the expected structure all collapse into this type.
/// `message` is diagnostic text only and is already scrubbed of secrets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{phase} generation failed: {message}")]
pub struct GenerationError {
    pub phase: GenerationPhase,
    pub message: String,
}

impl GenerationError {
    pub fn new(phase: GenerationPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
        }
    }

    pub fn scenario(message: impl Into<String>) -> Self {
        Self::new(GenerationPhase::Scenario, message)
    }

    pub fn reveal(message: impl Into<String>) -> Self {
        Self::new(GenerationPhase::Reveal, message)
    }

    /// Collapse any error chain into a generation failure for `phase`.
    pub fn from_anyhow(phase: GenerationPhase, err: &anyhow::Error) -> Self {
        Self::new(phase, format!("{err:#}"))
    }
}

// ─── Archive errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("record {id} has not been revealed")]
    NotRevealed { id: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PsychError>;
