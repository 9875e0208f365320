//! Ports for the external collaborators the bot depends on.
//!
//! Adapter crates implement these over HTTP; tests swap in fakes.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::{memory::ChatTurn, risk::AnalysisStats, Result};

/// Chat completion backend. Faults surface as `Error::Completion`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        prior: &[ChatTurn],
        user_message: &str,
    ) -> Result<String>;
}

/// The stored analysis of one URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlRecord {
    pub stats: AnalysisStats,
    pub times_submitted: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlLookup {
    Found(UrlRecord),
    /// The service has no (usable) record yet. Not a failure.
    NotFound,
}

/// URL reputation backend. Faults surface as `Error::Reputation`.
#[async_trait]
pub trait UrlReputationService: Send + Sync {
    async fn lookup(&self, url_id: &str) -> Result<UrlLookup>;

    /// Queue `url` for analysis so a later lookup finds it.
    async fn submit(&self, url: &str) -> Result<()>;
}

/// Token verification backend. Faults surface as `Error::Verification`.
#[async_trait]
pub trait TokenVerificationService: Send + Sync {
    async fn list_verified(&self) -> Result<serde_json::Value>;
}

/// URL-safe, unpadded base64 of the raw URL (the reputation service's object id).
pub fn url_identifier(url: &str) -> String {
    URL_SAFE_NO_PAD.encode(url.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_identifier_is_url_safe_and_unpadded() {
        assert_eq!(url_identifier("http://a.b"), "aHR0cDovL2EuYg");
        let id = url_identifier("https://example.com/?q=>>>???");
        assert!(!id.contains('='));
        assert!(!id.contains('+'));
        assert!(!id.contains('/'));
    }
}
