//! Configuration errors.
//!
//! Only construction of a search can fail. Everything that happens while a
//! search runs (crashes, alignment misses, empty sequences) is absorbed into
//! chromosome state instead.

/// Error raised when a [`SearchConfig`](crate::provider::SearchConfig) or a
/// builder composition is invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
    #[error("{component} '{kind}' cannot be used with {payload} chromosomes")]
    UnsupportedForPayload {
        component: &'static str,
        kind: String,
        payload: &'static str,
    },
    #[error("{algorithm} requires {requirement}")]
    Incompatible {
        algorithm: String,
        requirement: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name,
            reason: reason.into(),
        }
    }
}
