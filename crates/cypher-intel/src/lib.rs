//! Security-intelligence adapters.
//!
//! - VirusTotal v3: URL reputation lookups and submissions
//! - RugCheck: recently verified tokens

pub mod rugcheck;
pub mod virustotal;

pub use rugcheck::RugCheckClient;
pub use virustotal::VirusTotalClient;

use std::time::Duration;

use cypher_core::{errors::Error, Result};

fn http_client(service: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("{service} http client: {e}")))
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
