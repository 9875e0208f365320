use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use cypher_core::session::SessionOrchestrator;

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,
}

/// Long-poll Telegram until Ctrl-C.
///
/// The dispatcher runs updates from different chats concurrently and updates
/// from the same chat in order.
pub async fn run_polling(
    messenger: &TelegramMessenger,
    orchestrator: Arc<SessionOrchestrator>,
) -> anyhow::Result<()> {
    let bot = messenger.bot();

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "AgentCypher started"),
        Err(e) => warn!(error = %e, "could not fetch bot identity"),
    }

    let state = Arc::new(AppState { orchestrator });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|_upd| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("dispatcher stopped");
    Ok(())
}
