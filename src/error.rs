// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Glosten-Milgrom Market Simulator - Errors

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors surfaced to callers of the simulator.
///
/// Configuration problems are detected before the first iteration, so a
/// failed call never produces a partial trace.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid config: `{field}` {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig { field, reason: reason.into() }
    }

    /// Name of the offending field for `InvalidConfig`, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SimError::InvalidConfig { field, .. } => Some(field),
            _ => None,
        }
    }
}
