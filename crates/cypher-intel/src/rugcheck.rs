use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use cypher_core::{errors::Error, ports::TokenVerificationService, Result};

use crate::{http_client, preview};

/// RugCheck public API (no auth).
#[derive(Clone, Debug)]
pub struct RugCheckClient {
    base_url: String,
    http: reqwest::Client,
}

impl RugCheckClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http_client("rugcheck", timeout)?,
        })
    }

    fn verified_endpoint(&self) -> String {
        format!("{}/v1/stats/verified", self.base_url)
    }
}

#[async_trait]
impl TokenVerificationService for RugCheckClient {
    async fn list_verified(&self) -> Result<Value> {
        let resp = self
            .http
            .get(self.verified_endpoint())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Verification(format!("rugcheck request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Verification(format!(
                "rugcheck verified list failed: {status} {}",
                preview(&body)
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Verification(format!("rugcheck json error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_endpoint_path() {
        let c = RugCheckClient::new("https://api.rugcheck.xyz/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            c.verified_endpoint(),
            "https://api.rugcheck.xyz/v1/stats/verified"
        );
    }
}
