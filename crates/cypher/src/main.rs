use std::sync::Arc;

use cypher_cohere::CohereClient;
use cypher_intel::{RugCheckClient, VirusTotalClient};
use cypher_telegram::TelegramMessenger;

use cypher_core::{
    actions::{ActionHandlers, HandlerSettings},
    config::Config,
    known_scams::KnownScams,
    memory::ConversationStore,
    messaging::port::MessagingPort,
    session::SessionOrchestrator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cypher_core::logging::init("cypher")?;

    let cfg = Config::load()?;
    let timeout = cfg.collaborator_timeout;

    let completion = Arc::new(CohereClient::new(
        cfg.cohere_api_key.clone(),
        cfg.cohere_model.clone(),
        cfg.cohere_base_url.clone(),
        timeout,
    )?);
    let reputation = Arc::new(VirusTotalClient::new(
        cfg.virustotal_api_key.clone(),
        cfg.virustotal_base_url.clone(),
        timeout,
    )?);
    let verification = Arc::new(RugCheckClient::new(cfg.rugcheck_base_url.clone(), timeout)?);

    let handlers = Arc::new(ActionHandlers::new(
        completion,
        reputation,
        verification,
        Arc::new(ConversationStore::new()),
        Arc::new(KnownScams::load(&cfg.known_scams_path)),
        HandlerSettings::from_config(&cfg),
    ));

    let telegram = TelegramMessenger::from_config(&cfg);
    let messenger: Arc<dyn MessagingPort> = Arc::new(telegram.clone());
    let orchestrator = Arc::new(SessionOrchestrator::new(handlers, messenger));

    tracing::info!(model = %cfg.cohere_model, ?timeout, "starting AgentCypher");
    cypher_telegram::router::run_polling(&telegram, orchestrator).await
}
