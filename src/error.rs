//! Errors surfaced at the collaborator boundary
//!
//! The per-frame simulation never fails; these only come out of session
//! creation and configuration loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrawlError {
    #[error("unknown brawler '{0}'")]
    UnknownBrawler(String),
    #[error("invalid tuning value for {field}: {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: String,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
