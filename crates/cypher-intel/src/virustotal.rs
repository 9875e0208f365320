use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use cypher_core::{
    errors::Error,
    ports::{UrlLookup, UrlRecord, UrlReputationService},
    risk::AnalysisStats,
    Result,
};

use crate::{http_client, preview};

#[derive(Clone, Debug)]
pub struct VirusTotalClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl VirusTotalClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: http_client("virustotal", timeout)?,
        })
    }

    fn urls_endpoint(&self) -> String {
        format!("{}/urls", self.base_url)
    }
}

#[async_trait]
impl UrlReputationService for VirusTotalClient {
    async fn lookup(&self, url_id: &str) -> Result<UrlLookup> {
        let resp = self
            .http
            .get(format!("{}/{url_id}", self.urls_endpoint()))
            .header("x-apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Reputation(format!("virustotal request error: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Reputation(format!("virustotal body error: {e}")))?;
        debug!(%status, "virustotal lookup");

        let Ok(v) = serde_json::from_str::<Value>(&body) else {
            return Err(Error::Reputation(format!(
                "virustotal returned non-json: {status} {}",
                preview(&body)
            )));
        };
        if !status.is_success() && v.get("error").is_none() {
            return Err(Error::Reputation(format!(
                "virustotal lookup failed: {status} {}",
                preview(&body)
            )));
        }

        Ok(parse_lookup(&v))
    }

    async fn submit(&self, url: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.urls_endpoint())
            .header("x-apikey", &self.api_key)
            .form(&[("url", url)])
            .send()
            .await
            .map_err(|e| Error::Reputation(format!("virustotal submit error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Reputation(format!(
                "virustotal submit failed: {status} {}",
                preview(&body)
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UrlAttributes {
    last_analysis_stats: AnalysisStats,
    times_submitted: Option<u64>,
}

/// An `error` object (NotFoundError and friends) means "no usable record".
fn parse_lookup(v: &Value) -> UrlLookup {
    if let Some(err) = v.get("error") {
        let code = err.get("code").and_then(Value::as_str).unwrap_or("unknown");
        if code != "NotFoundError" {
            warn!(code, "virustotal returned an error record");
        }
        return UrlLookup::NotFound;
    }

    let attrs = v
        .pointer("/data/attributes")
        .cloned()
        .and_then(|a| serde_json::from_value::<UrlAttributes>(a).ok())
        .unwrap_or_default();

    UrlLookup::Found(UrlRecord {
        stats: attrs.last_analysis_stats,
        times_submitted: attrs.times_submitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_analysis_stats_and_submissions() {
        let v = json!({
          "data": {
            "id": "aHR0cDovL2EuYg",
            "type": "url",
            "attributes": {
              "times_submitted": 12,
              "last_analysis_stats": {
                "harmless": 60, "malicious": 3, "suspicious": 1, "undetected": 8, "timeout": 0
              }
            }
          }
        });
        assert_eq!(
            parse_lookup(&v),
            UrlLookup::Found(UrlRecord {
                stats: AnalysisStats {
                    harmless: 60,
                    malicious: 3,
                    suspicious: 1,
                    undetected: 8,
                },
                times_submitted: Some(12),
            })
        );
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let v = json!({ "data": { "attributes": {} } });
        assert_eq!(parse_lookup(&v), UrlLookup::Found(UrlRecord::default()));
    }

    #[test]
    fn error_records_are_not_found() {
        let v = json!({ "error": { "code": "NotFoundError", "message": "URL not found" } });
        assert_eq!(parse_lookup(&v), UrlLookup::NotFound);

        let v = json!({ "error": { "code": "QuotaExceededError" } });
        assert_eq!(parse_lookup(&v), UrlLookup::NotFound);
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let c = VirusTotalClient::new("k", "https://vt.example/api/v3/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(c.urls_endpoint(), "https://vt.example/api/v3/urls");
    }
}
