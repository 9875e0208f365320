//! One handler per [`Action`]: collaborator call, memory update, reply text.
//!
//! Handlers never retry. Collaborator faults come back as `Err` and the
//! orchestrator turns them into [`failure_reply`].

use std::{future::Future, sync::Arc, time::Duration};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    errors::Error,
    intent::{Action, Route},
    known_scams::KnownScams,
    memory::ConversationStore,
    messaging::types::Sender,
    ports::{
        url_identifier, CompletionService, TokenVerificationService, UrlLookup, UrlRecord,
        UrlReputationService,
    },
    risk::summarize,
    Result,
};

/// Stored turns passed to the completion service as context for free-form chat.
pub const CONTEXT_TURNS: usize = 4;

pub mod replies {
    pub const HELP: &str = "Commands:\n\
/check_scam <text> - Check if a text is a scam.\n\
/verified_tokens - Get a list of recently verified tokens.\n\
/scan_url <url> - Scan a suspicious URL.\n\
You can also chat with me directly, or send \"scan url <url>\".";

    pub const KNOWN_SCAM: &str =
        "⚠️ This looks like a known scam from our database. Stay cautious! 🚨";
    pub const CHECK_SCAM_FAILED: &str = "Sorry, I couldn't process your request at the moment.";
    pub const TOKENS_FAILED: &str = "❌ Could not fetch verification status for the tokens at this time. Please try again later.";
    pub const URL_SUBMITTED: &str = "URL not found in the VirusTotal database. Submitted for scanning. Try again after a few minutes.";
    pub const SCAN_FAILED: &str = "An error occurred while scanning the URL.";
    pub const CHAT_FAILED: &str = "I'm currently experiencing some technical difficulties. Please try using specific commands like /check_scam or /scan_url for now.";
    pub const GENERIC_FAILURE: &str =
        "Sorry, something went wrong while handling your message. Please try again.";
    pub const EMPTY_MESSAGE: &str =
        "Send me a message to chat, or use /help to see the available commands.";

    pub const SCAM_DETECTOR: &str = "You are a scam detector. Respond with 'Scam:' or 'Not a Scam:' and provide a brief explanation. You are especially familiar with crypto and social-media scam patterns.";

    pub const PERSONA: &str = "You are AgentCypher, a helpful AI assistant that specializes in:
1. Detecting crypto and web3 scams
2. Analyzing suspicious URLs
3. Verifying tokens and smart contracts
4. Providing general blockchain security advice

Keep your responses concise and focused on helping users with security-related queries.
If you're unsure about something, be honest about it.";
}

/// The reply an action degrades to when its collaborator fails.
pub fn failure_reply(action: &Action) -> &'static str {
    match action {
        Action::CheckScam(_) => replies::CHECK_SCAM_FAILED,
        Action::ListVerifiedTokens => replies::TOKENS_FAILED,
        Action::ScanUrl(_) => replies::SCAN_FAILED,
        Action::FreeformChat(_) => replies::CHAT_FAILED,
        Action::Start | Action::Help | Action::Unrecognized { .. } => replies::GENERIC_FAILURE,
    }
}

/// Label the completion service put in front of a scam analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScamVerdict {
    Scam,
    NotScam,
    Unclear,
}

impl ScamVerdict {
    pub fn from_completion(text: &str) -> Self {
        let lower = text.trim_start().trim_start_matches(['*', '#', ' ']).to_lowercase();
        if lower.starts_with("scam:") {
            ScamVerdict::Scam
        } else if lower.starts_with("not a scam:") {
            ScamVerdict::NotScam
        } else {
            ScamVerdict::Unclear
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HandlerSettings {
    pub collaborator_timeout: Duration,
    pub verified_tokens_limit: usize,
}

impl HandlerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            collaborator_timeout: cfg.collaborator_timeout,
            verified_tokens_limit: cfg.verified_tokens_limit,
        }
    }
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            collaborator_timeout: Duration::from_secs(30),
            verified_tokens_limit: 20,
        }
    }
}

pub struct ActionHandlers {
    completion: Arc<dyn CompletionService>,
    reputation: Arc<dyn UrlReputationService>,
    verification: Arc<dyn TokenVerificationService>,
    memory: Arc<ConversationStore>,
    known_scams: Arc<KnownScams>,
    settings: HandlerSettings,
}

impl ActionHandlers {
    pub fn new(
        completion: Arc<dyn CompletionService>,
        reputation: Arc<dyn UrlReputationService>,
        verification: Arc<dyn TokenVerificationService>,
        memory: Arc<ConversationStore>,
        known_scams: Arc<KnownScams>,
        settings: HandlerSettings,
    ) -> Self {
        Self {
            completion,
            reputation,
            verification,
            memory,
            known_scams,
            settings,
        }
    }

    pub async fn handle(&self, sender: &Sender, route: Route) -> Result<String> {
        let action = match route {
            Route::MissingArgument(cmd) => {
                debug!(user_id = sender.user_id.0, "command is missing its argument");
                return Ok(cmd.usage().to_string());
            }
            Route::Action(a) => a,
        };

        match action {
            Action::Start => Ok(self.start(sender).await),
            Action::Help => Ok(replies::HELP.to_string()),
            Action::CheckScam(text) => self.check_scam(&text).await,
            Action::ListVerifiedTokens => self.verified_tokens().await,
            Action::ScanUrl(url) => self.scan_url(&url).await,
            Action::FreeformChat(text) => self.chat(sender, &text).await,
            Action::Unrecognized { command: Some(cmd) } => Ok(format!(
                "Unknown command: /{cmd}. Use /help to see the available commands."
            )),
            Action::Unrecognized { command: None } => Ok(replies::EMPTY_MESSAGE.to_string()),
        }
    }

    async fn start(&self, sender: &Sender) -> String {
        self.memory.reset(sender.user_id).await;
        let name = sender.first_name.as_deref().unwrap_or("there");
        format!(
            "Hi {name}! I'm AgentCypher 🤖. I can help you check scams, verify tokens, and scan URLs. \
Just send a message or use a command. For help, use /help to view the available commands!"
        )
    }

    async fn check_scam(&self, text: &str) -> Result<String> {
        if self.known_scams.matches(text) {
            info!("text matched the known scams database");
            return Ok(replies::KNOWN_SCAM.to_string());
        }

        let prompt = format!("Analyze this: {text}");
        let analysis = self
            .bounded(
                "completion service",
                self.completion.complete(replies::SCAM_DETECTOR, &[], &prompt),
            )
            .await?;

        let verdict = ScamVerdict::from_completion(&analysis);
        info!(?verdict, "scam analysis complete");
        Ok(format!(
            "🕵️ Analysis result:\n{analysis}\n\nWhat else can I assist you with?"
        ))
    }

    async fn verified_tokens(&self) -> Result<String> {
        let tokens = self
            .bounded(
                "token verification service",
                self.verification.list_verified(),
            )
            .await?;
        let listing = render_verified_tokens(&tokens, self.settings.verified_tokens_limit);
        Ok(format!(
            "✅ Token status:\n{listing}\n\nLet me know if you need help with anything else!"
        ))
    }

    async fn scan_url(&self, url: &str) -> Result<String> {
        let url_id = url_identifier(url);
        let lookup = self
            .bounded("url reputation service", self.reputation.lookup(&url_id))
            .await?;

        match lookup {
            UrlLookup::Found(record) => Ok(render_url_report(&record)),
            UrlLookup::NotFound => {
                info!(url, "url has no analysis record yet; submitting");
                let submitted = self
                    .bounded("url reputation service", self.reputation.submit(url))
                    .await;
                if let Err(e) = submitted {
                    warn!(url, error = %e, "url submission failed");
                }
                Ok(replies::URL_SUBMITTED.to_string())
            }
        }
    }

    async fn chat(&self, sender: &Sender, text: &str) -> Result<String> {
        // Held across the completion call: same-user chats run one at a time.
        let mut convo = self.memory.lock(sender.user_id).await;
        let prior = convo.recent(CONTEXT_TURNS).to_vec();

        let reply = self
            .bounded(
                "completion service",
                self.completion.complete(replies::PERSONA, &prior, text),
            )
            .await?;

        convo.append_exchange(text, &reply);
        Ok(reply)
    }

    async fn bounded<T>(
        &self,
        service: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let after = self.settings.collaborator_timeout;
        tokio::time::timeout(after, fut)
            .await
            .map_err(|_| Error::Timeout { service, after })?
    }
}

pub fn render_url_report(record: &UrlRecord) -> String {
    let s = summarize(&record.stats);
    let mut out = String::from("🔍 URL Analysis Results\n\n");
    if let Some(n) = record.times_submitted {
        out.push_str(&format!("Times submitted: {n}\n\n"));
    }
    out.push_str(&format!(
        "  Harmless: {}\n  Malicious: {}\n  Suspicious: {}\n  Undetected: {}\n\n",
        s.harmless, s.malicious, s.suspicious, s.undetected
    ));
    out.push_str(&format!(
        "Risk Summary:\n  Total Malicious or Suspicious Reports: {}\n  Risk Score: {}%\n",
        s.flagged(),
        s.risk_score
    ));
    out
}

/// One line per token for a JSON array of objects; pretty JSON otherwise.
pub fn render_verified_tokens(tokens: &Value, limit: usize) -> String {
    let Some(items) = tokens.as_array() else {
        return serde_json::to_string_pretty(tokens).unwrap_or_else(|_| tokens.to_string());
    };
    if items.is_empty() {
        return "No recently verified tokens.".to_string();
    }
    if !items.iter().all(Value::is_object) {
        return serde_json::to_string_pretty(tokens).unwrap_or_else(|_| tokens.to_string());
    }

    let mut lines: Vec<String> = items.iter().take(limit).map(token_line).collect();
    if items.len() > limit {
        lines.push(format!("... and {} more", items.len() - limit));
    }
    lines.join("\n")
}

fn token_line(item: &Value) -> String {
    let field = |k: &str| item.get(k).and_then(Value::as_str).filter(|s| !s.is_empty());

    let mut line = String::from("• ");
    match (field("symbol"), field("name")) {
        (Some(sym), Some(name)) => line.push_str(&format!("{sym} ({name})")),
        (Some(one), None) | (None, Some(one)) => line.push_str(one),
        (None, None) => line.push_str("unnamed token"),
    }
    if let Some(mint) = field("mint") {
        line.push_str(&format!(": {mint}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::AnalysisStats;
    use serde_json::json;

    #[test]
    fn verdict_reads_the_leading_label() {
        assert_eq!(ScamVerdict::from_completion("Scam: wallet drainer"), ScamVerdict::Scam);
        assert_eq!(
            ScamVerdict::from_completion("**Not a Scam:** looks fine"),
            ScamVerdict::NotScam
        );
        assert_eq!(ScamVerdict::from_completion("Hard to say."), ScamVerdict::Unclear);
    }

    #[test]
    fn url_report_lists_counts_and_score() {
        let report = render_url_report(&UrlRecord {
            stats: AnalysisStats {
                harmless: 90,
                malicious: 5,
                suspicious: 5,
                undetected: 0,
            },
            times_submitted: Some(3),
        });
        assert!(report.contains("Times submitted: 3"));
        assert!(report.contains("Harmless: 90"));
        assert!(report.contains("Total Malicious or Suspicious Reports: 10"));
        assert!(report.contains("Risk Score: 10%"));
    }

    #[test]
    fn url_report_without_reports_scores_zero() {
        let report = render_url_report(&UrlRecord::default());
        assert!(report.contains("Risk Score: 0%"));
        assert!(!report.contains("Times submitted"));
    }

    #[test]
    fn verified_tokens_render_one_line_each_with_cap() {
        let tokens = json!([
            {"mint": "M1", "symbol": "AAA", "name": "Alpha"},
            {"mint": "M2", "symbol": "BBB"},
            {"name": "Gamma"},
        ]);
        let out = render_verified_tokens(&tokens, 2);
        assert_eq!(out, "• AAA (Alpha): M1\n• BBB: M2\n... and 1 more");
    }

    #[test]
    fn verified_tokens_fall_back_to_json() {
        assert_eq!(render_verified_tokens(&json!([]), 5), "No recently verified tokens.");
        let out = render_verified_tokens(&json!({"count": 2}), 5);
        assert!(out.contains("\"count\": 2"));
    }

    #[test]
    fn failure_replies_are_action_specific() {
        assert_eq!(failure_reply(&Action::FreeformChat("x".into())), replies::CHAT_FAILED);
        assert_eq!(failure_reply(&Action::ScanUrl("x".into())), replies::SCAN_FAILED);
        assert_eq!(failure_reply(&Action::Help), replies::GENERIC_FAILURE);
    }
}
