use std::time::Duration;

/// Core error type for the bot.
///
/// Adapter crates map their transport errors into this type so the session
/// orchestrator can decide, per action, which degraded reply the user sees.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("completion service error: {0}")]
    Completion(String),

    #[error("url reputation service error: {0}")]
    Reputation(String),

    #[error("token verification service error: {0}")]
    Verification(String),

    #[error("{service} did not answer within {after:?}")]
    Timeout {
        service: &'static str,
        after: Duration,
    },

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// True for faults raised by (or while waiting on) an external collaborator.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Error::Completion(_)
                | Error::Reputation(_)
                | Error::Verification(_)
                | Error::Timeout { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
