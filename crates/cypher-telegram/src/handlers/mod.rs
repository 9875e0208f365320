//! Telegram update handlers.
//!
//! Each update is converted into a transport-agnostic `IncomingMessage` and
//! handed to the core session orchestrator, which always replies.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};
use tracing::debug;

use cypher_core::{
    domain::{ChatId, UserId},
    messaging::types::{Command, IncomingMessage, Sender, TextMessage},
};

use crate::router::AppState;

mod commands;

pub use commands::parse_command;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(incoming) = to_incoming(&msg) else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-text update");
        return Ok(());
    };

    state.orchestrator.handle(incoming).await;
    Ok(())
}

fn to_incoming(msg: &Message) -> Option<IncomingMessage> {
    let user = msg.from()?;
    let text = msg.text()?;

    let sender = Sender {
        chat_id: ChatId(msg.chat.id.0),
        user_id: UserId(user.id.0 as i64),
        first_name: Some(user.first_name.clone()).filter(|n| !n.trim().is_empty()),
    };

    if text.starts_with('/') {
        let (name, args) = parse_command(text);
        return Some(IncomingMessage::Command(Command { sender, name, args }));
    }

    Some(IncomingMessage::Text(TextMessage {
        sender,
        text: text.to_string(),
    }))
}
