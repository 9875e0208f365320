use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

pub const DEFAULT_COHERE_MODEL: &str = "command-r-plus";
pub const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com/api/v3";
pub const DEFAULT_RUGCHECK_BASE_URL: &str = "https://api.rugcheck.xyz";

/// Typed configuration, read from the environment (and an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Transport
    pub telegram_bot_token: String,
    pub telegram_message_limit: usize,

    // Completion service
    pub cohere_api_key: String,
    pub cohere_model: String,
    pub cohere_base_url: String,

    // URL reputation / token verification
    pub virustotal_api_key: String,
    pub virustotal_base_url: String,
    pub rugcheck_base_url: String,

    // Behavior
    pub collaborator_timeout: Duration,
    pub known_scams_path: PathBuf,
    pub verified_tokens_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN")
            .and_then(non_empty)
            .or_else(|| env_str("TELEGRAM_TOKEN").and_then(non_empty))
            .ok_or_else(|| required("TELEGRAM_BOT_TOKEN"))?;
        let cohere_api_key = env_str("COHERE_API_KEY")
            .and_then(non_empty)
            .ok_or_else(|| required("COHERE_API_KEY"))?;
        let virustotal_api_key = env_str("VIRUSTOTAL_API_KEY")
            .and_then(non_empty)
            .ok_or_else(|| required("VIRUSTOTAL_API_KEY"))?;

        let cohere_model = env_str("COHERE_MODEL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_COHERE_MODEL.to_string());
        let cohere_base_url = base_url("COHERE_BASE_URL", DEFAULT_COHERE_BASE_URL);
        let virustotal_base_url = base_url("VIRUSTOTAL_BASE_URL", DEFAULT_VIRUSTOTAL_BASE_URL);
        let rugcheck_base_url = base_url("RUGCHECK_BASE_URL", DEFAULT_RUGCHECK_BASE_URL);

        let collaborator_timeout =
            Duration::from_millis(env_u64("COLLABORATOR_TIMEOUT_MS").unwrap_or(30_000).max(1));
        let known_scams_path = PathBuf::from(
            env_str("KNOWN_SCAMS_PATH")
                .and_then(non_empty)
                .unwrap_or_else(|| "urls.csv".to_string()),
        );
        let verified_tokens_limit = env_usize("VERIFIED_TOKENS_LIMIT").unwrap_or(20).max(1);
        let telegram_message_limit = env_usize("TELEGRAM_MESSAGE_LIMIT").unwrap_or(4096).max(64);

        Ok(Self {
            telegram_bot_token,
            telegram_message_limit,
            cohere_api_key,
            cohere_model,
            cohere_base_url,
            virustotal_api_key,
            virustotal_base_url,
            rugcheck_base_url,
            collaborator_timeout,
            known_scams_path,
            verified_tokens_limit,
        })
    }
}

fn required(key: &str) -> Error {
    Error::Config(format!("{key} environment variable is required"))
}

fn base_url(key: &str, default: &str) -> String {
    env_str(key)
        .and_then(non_empty)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_parsing_skips_comments_and_strips_quotes() {
        let parsed = parse_dotenv(
            "# comment\n\nCOHERE_API_KEY=\"abc\"\nexport VIRUSTOTAL_API_KEY='vt'\nnot a pair\n=novalue\n",
        );
        assert_eq!(
            parsed,
            vec![
                ("COHERE_API_KEY".to_string(), "abc".to_string()),
                ("VIRUSTOTAL_API_KEY".to_string(), "vt".to_string()),
            ]
        );
    }

    #[test]
    fn non_empty_trims_and_rejects_blank() {
        assert_eq!(non_empty("  x ".to_string()), Some("x".to_string()));
        assert_eq!(non_empty("   ".to_string()), None);
    }
}
