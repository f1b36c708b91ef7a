//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// The variants follow the recovery boundaries of the engine: rule
/// violations are expected rejections returned to the caller, not-found
/// is answered by the query side, concurrency conflicts are retried by the
/// dispatcher, and invariant violations mean the stored history is
/// inconsistent and must abort the operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate or read model entry was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// Malformed input rejected before it reaches an aggregate.
    #[error("validation error: {0}")]
    Validation(String),

    /// A game rule refused the command. No event was emitted.
    #[error("rule violation [{}]: {}", .0.code, .0.message)]
    RuleViolation(RuleViolation),

    /// Aggregate state contradicts itself (e.g. the active player is not
    /// a member of the game).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for errors worth retrying unchanged.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyConflict { .. } | Self::Infrastructure(_)
        )
    }
}

/// A structured game-rule rejection.
///
/// Each bounded context converts its own rule enum into this shape so
/// callers receive a stable machine-readable `code` next to the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RuleViolation {
    /// Stable snake-case identifier, e.g. `"game_full"`.
    pub code: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

impl RuleViolation {
    /// Creates a new rule violation.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors raised while constructing value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The string is not a valid UUID.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A coordinate is negative.
    #[error("invalid position ({x}, {y}): coordinates must be non-negative")]
    InvalidPosition {
        /// Horizontal coordinate.
        x: i32,
        /// Vertical coordinate.
        y: i32,
    },

    /// Health values outside `0 <= current <= maximum <= 1000`.
    #[error("invalid health {current}/{maximum}")]
    InvalidHealth {
        /// Current hit points.
        current: u32,
        /// Maximum hit points.
        maximum: u32,
    },

    /// The string is not an RFC 3339 timestamp.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Unknown enumeration value (terrain, unit type, ...).
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// What was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl From<ValueError> for DomainError {
    fn from(err: ValueError) -> Self {
        Self::Validation(err.to_string())
    }
}
