use crate::domain::{ChatId, UserId};

/// Transport-agnostic inbound message.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingMessage {
    Command(Command),
    Text(TextMessage),
}

impl IncomingMessage {
    pub fn sender(&self) -> &Sender {
        match self {
            IncomingMessage::Command(c) => &c.sender,
            IncomingMessage::Text(t) => &t.sender,
        }
    }

    /// The text as the user typed it, for logs.
    pub fn original_text(&self) -> String {
        match self {
            IncomingMessage::Command(c) if c.args.is_empty() => format!("/{}", c.name),
            IncomingMessage::Command(c) => format!("/{} {}", c.name, c.args),
            IncomingMessage::Text(t) => t.text.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Sender {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub first_name: Option<String>,
}

/// An explicit bot command (`/name args`).
#[derive(Clone, Debug)]
pub struct Command {
    pub sender: Sender,
    pub name: String,
    pub args: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub sender: Sender,
    pub text: String,
}

/// Outgoing "chat action" (typing indicator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_chat_actions: bool,
    pub max_message_len: usize,
}

/// Truncate `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_for_transport(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    const MARKER: &str = "\n…";
    let keep = max_chars.saturating_sub(MARKER.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(MARKER);
    out
}
