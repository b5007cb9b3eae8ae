//! Error types for the neonplay wagering engine
//!
//! Bet rejections are plain values: a rejected call never mutates engine state.

use crate::games::types::GameType;
use std::fmt;
use std::error::Error as StdError;

/// Root error type for all engine operations
#[derive(Debug)]
pub enum EngineError {
    /// Configuration related errors
    Configuration(ConfigurationError),

    /// A bet or game action was refused before touching any state
    Bet(BetRejection),

    /// A round was accepted but its result never arrived
    Settlement(String),
}

/// Configuration and validation errors
#[derive(Debug)]
pub enum ConfigurationError {
    ValidationFailed(String),
    InvalidValue { field: String, value: String, reason: String },
    LoadFailed(String),
    SaveFailed(String),
}

/// Reasons a bet or game action is declined
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BetRejection {
    #[error("Stake must be at least 1")]
    InvalidStake,

    #[error("Stake {stake} exceeds balance {balance}")]
    InsufficientBalance { stake: u64, balance: f64 },

    #[error("A {0} round is already in progress")]
    RoundInProgress(GameType),

    #[error("No roulette color selected")]
    NoColorSelected,

    #[error("Dice target {0} is outside 2..=12")]
    InvalidTarget(u8),

    #[error("{game} cannot do that while {phase}")]
    InvalidPhase { game: GameType, phase: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Configuration(e) => write!(f, "Configuration error: {}", e),
            EngineError::Bet(e) => write!(f, "Bet rejected: {}", e),
            EngineError::Settlement(msg) => write!(f, "Settlement error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
            ConfigurationError::InvalidValue { field, value, reason } => {
                write!(f, "Invalid value for {}: '{}' ({})", field, value, reason)
            }
            ConfigurationError::LoadFailed(msg) => write!(f, "Failed to load configuration: {}", msg),
            ConfigurationError::SaveFailed(msg) => write!(f, "Failed to save configuration: {}", msg),
        }
    }
}

impl StdError for EngineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EngineError::Configuration(e) => Some(e),
            EngineError::Bet(e) => Some(e),
            EngineError::Settlement(_) => None,
        }
    }
}

impl StdError for ConfigurationError {}

impl From<ConfigurationError> for EngineError {
    fn from(e: ConfigurationError) -> Self {
        EngineError::Configuration(e)
    }
}

impl From<BetRejection> for EngineError {
    fn from(e: BetRejection) -> Self {
        EngineError::Bet(e)
    }
}

// Convenience type alias for Results
pub type EngineResult<T> = Result<T, EngineError>;
