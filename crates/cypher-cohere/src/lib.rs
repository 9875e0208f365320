//! Cohere adapter (chat completion).
//!
//! Implements the core `CompletionService` over the Cohere v2 `/chat` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use cypher_core::{
    errors::Error,
    memory::{ChatTurn, Role},
    ports::CompletionService,
    Result,
};

#[derive(Clone, Debug)]
pub struct CohereClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl CohereClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("cohere http client: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            http,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/v2/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for CohereClient {
    async fn complete(
        &self,
        system_instruction: &str,
        prior: &[ChatTurn],
        user_message: &str,
    ) -> Result<String> {
        let body = build_chat_body(&self.model, system_instruction, prior, user_message);
        debug!(model = %self.model, prior = prior.len(), "cohere chat request");

        let resp = self
            .http
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("cohere request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Completion(format!(
                "cohere chat failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let v: Value = resp
            .json()
            .await
            .map_err(|e| Error::Completion(format!("cohere json error: {e}")))?;

        extract_reply_text(&v)
    }
}

fn build_chat_body(model: &str, system: &str, prior: &[ChatTurn], user: &str) -> Value {
    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(json!({ "role": "system", "content": system }));
    for turn in prior {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        messages.push(json!({ "role": role, "content": turn.content }));
    }
    messages.push(json!({ "role": "user", "content": user }));

    json!({ "model": model, "messages": messages })
}

/// Concatenate the text parts of `message.content`.
fn extract_reply_text(v: &Value) -> Result<String> {
    let text = v
        .pointer("/message/content")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter(|p| p.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::Completion(
            "cohere chat returned empty text".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_orders_system_history_then_user() {
        let prior = vec![ChatTurn::user("q1"), ChatTurn::assistant("a1")];
        let body = build_chat_body("command-r-plus", "sys", &prior, "q2");

        assert_eq!(body["model"], "command-r-plus");
        let roles: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(body["messages"][3]["content"], "q2");
    }

    #[test]
    fn reply_text_joins_text_parts() {
        let v = json!({
          "id": "x",
          "message": {
            "role": "assistant",
            "content": [
              { "type": "text", "text": "Scam: " },
              { "type": "thinking", "thinking": "hmm" },
              { "type": "text", "text": "classic giveaway fraud." }
            ]
          }
        });
        assert_eq!(
            extract_reply_text(&v).unwrap(),
            "Scam: classic giveaway fraud."
        );
    }

    #[test]
    fn empty_reply_is_a_completion_error() {
        let err = extract_reply_text(&json!({ "message": { "content": [] } })).unwrap_err();
        assert!(err.is_collaborator_failure());
    }

    #[test]
    fn chat_url_tolerates_trailing_slash() {
        let c = CohereClient::new("k", "m", "https://api.cohere.com/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(c.chat_url(), "https://api.cohere.com/v2/chat");
    }
}
