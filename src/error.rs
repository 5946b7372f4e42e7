//! Error types
//!
//! Only loading configuration can fail. The simulation step itself never
//! returns an error: bad playfield sizes just produce an empty scene.

/// Failure to load or validate an [`crate::ArenaConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}
