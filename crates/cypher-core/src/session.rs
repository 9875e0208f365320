//! Top-level entry point, invoked once per inbound message.
//!
//! The orchestrator routes the message, runs exactly one handler and emits
//! exactly one reply. Handlers run in their own task, so both their errors and
//! their panics are contained here and become the action's failure reply.
//! Nothing propagates to the transport loop.
//!
//! Collaborator failures are expected operational noise and are logged with
//! the user's text. Any other handler error is a bug and is logged as an
//! internal fault without it.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    actions::{failure_reply, replies, ActionHandlers},
    intent::{self, Route},
    messaging::{
        port::MessagingPort,
        types::{truncate_for_transport, ChatAction, IncomingMessage},
    },
};

pub struct SessionOrchestrator {
    handlers: Arc<ActionHandlers>,
    messenger: Arc<dyn MessagingPort>,
}

impl SessionOrchestrator {
    pub fn new(handlers: Arc<ActionHandlers>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self {
            handlers,
            messenger,
        }
    }

    /// Handle one inbound message and send the reply.
    pub async fn handle(&self, msg: IncomingMessage) {
        let chat_id = msg.sender().chat_id;
        let reply = self.respond(&msg).await;

        let caps = self.messenger.capabilities();
        let reply = truncate_for_transport(&reply, caps.max_message_len);
        if let Err(e) = self.messenger.send_text(chat_id, &reply).await {
            error!(chat_id = chat_id.0, error = %e, "failed to deliver reply");
        }
    }

    /// Compute the reply for one inbound message. Never fails.
    pub async fn respond(&self, msg: &IncomingMessage) -> String {
        let sender = msg.sender().clone();
        let route = intent::route(msg);
        let action = match &route {
            Route::Action(a) => Some(a.clone()),
            Route::MissingArgument(_) => None,
        };
        let action_name = action.as_ref().map_or("missing_argument", |a| a.name());
        info!(user_id = sender.user_id.0, action = action_name, "routing message");

        if action.as_ref().is_some_and(|a| a.calls_collaborator()) {
            self.typing_hint(&sender.chat_id);
        }

        let handlers = self.handlers.clone();
        let task_sender = sender.clone();
        let outcome = tokio::spawn(async move { handlers.handle(&task_sender, route).await }).await;

        let fallback = || action.as_ref().map_or(replies::GENERIC_FAILURE, failure_reply);
        match outcome {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) if e.is_collaborator_failure() => {
                error!(
                    user_id = sender.user_id.0,
                    action = action_name,
                    text = %msg.original_text(),
                    error = %e,
                    "collaborator failed"
                );
                fallback().to_string()
            }
            Ok(Err(e)) => {
                error!(
                    user_id = sender.user_id.0,
                    action = action_name,
                    error = ?e,
                    "unexpected internal fault"
                );
                fallback().to_string()
            }
            Err(e) => {
                error!(
                    user_id = sender.user_id.0,
                    action = action_name,
                    text = %msg.original_text(),
                    error = %e,
                    "action handler aborted"
                );
                fallback().to_string()
            }
        }
    }

    fn typing_hint(&self, chat_id: &crate::domain::ChatId) {
        if !self.messenger.capabilities().supports_chat_actions {
            return;
        }
        let messenger = self.messenger.clone();
        let chat_id = *chat_id;
        tokio::spawn(async move {
            let _ = messenger.send_chat_action(chat_id, ChatAction::Typing).await;
        });
    }
}
