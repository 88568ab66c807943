use thiserror::Error;

/// Reasons an ingested record is skipped instead of becoming a bubble.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    #[error("entity has an empty id")]
    EmptyId,
    #[error("entity {id} has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },
    #[error("entity {id} is a {found}, this view shows {expected}s")]
    KindMismatch {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("duplicate entity id {0}")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown timeframe {0:?} (expected m5, h1, h6 or h24)")]
    UnknownTimeframe(String),
    #[error("unknown trade direction {0:?} (expected buy or sell)")]
    UnknownDirection(String),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}
