//! Wires everything together: config → Slack client + Socket Mode →
//! dispatcher loop → scheduler, with ctrl-c shutdown.

use crate::backend::PraiseClient;
use crate::config::Config;
use crate::providers::{CompletionProvider, OpenAIProvider};
use crate::scheduler::{ScheduledJob, Scheduler, detect_system_timezone};
use crate::slack::{SlackClient, socket};
use crate::workflows::{Dispatcher, thought};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

const INBOUND_QUEUE_SIZE: usize = 100;

pub async fn run(config: Config) -> Result<()> {
    if config.slack.bot_token.is_empty() {
        error!("Slack botToken not configured");
        anyhow::bail!("Slack botToken not configured");
    }
    if config.slack.app_token.is_empty() {
        error!("Slack appToken not configured (needed for Socket Mode)");
        anyhow::bail!("Slack appToken not configured");
    }

    let slack = Arc::new(SlackClient::new(config.slack.bot_token.clone()));

    // Verify the bot token and learn our own user ID so the dispatcher can
    // ignore the bot's own reactions
    let (user, user_id) = slack.auth_test().await?;
    info!("Slack bot connected as {} (ID: {})", user, user_id);

    let provider: Option<Arc<dyn CompletionProvider>> = if config.openai.api_key.is_empty() {
        if config.workflows.news.enabled {
            warn!("OpenAI apiKey not configured; the news workflow is disabled");
        }
        None
    } else {
        Some(Arc::new(OpenAIProvider::with_base_url(
            config.openai.api_key.clone(),
            Some(config.openai.model.clone()),
            config.openai.api_base.clone(),
        )))
    };

    let backend = if config.backend.url.is_empty() {
        info!("No praise backend configured; kudos are not persisted");
        None
    } else {
        Some(PraiseClient::new(
            config.backend.url.clone(),
            config.backend.token.clone(),
        ))
    };

    let dispatcher = Arc::new(Dispatcher::new(
        slack.clone(),
        provider,
        backend,
        config.workflows.clone(),
        Some(user_id),
    ));

    let (inbound_tx, mut inbound_rx) = mpsc::channel(INBOUND_QUEUE_SIZE);
    let socket_handle = socket::spawn(config.slack.app_token.clone(), inbound_tx);

    let dispatch_handle = tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move {
            while let Some(event) = inbound_rx.recv().await {
                dispatcher.handle(event).await;
            }
        }
    });

    let scheduler = build_scheduler(&config, slack.clone());
    if let Some(ref scheduler) = scheduler {
        scheduler.start().await?;
    }

    info!("otterbot v{} is running, press ctrl-c to stop", crate::VERSION);
    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    if let Some(ref scheduler) = scheduler {
        scheduler.stop().await;
    }
    socket_handle.abort();
    dispatch_handle.abort();
    Ok(())
}

fn build_scheduler(config: &Config, slack: Arc<SlackClient>) -> Option<Scheduler> {
    let thought_config = config.workflows.thought.clone();
    if !thought_config.enabled {
        return None;
    }

    let timezone = if thought_config.timezone.is_empty() {
        detect_system_timezone()
    } else {
        Some(thought_config.timezone.clone())
    };

    let job = ScheduledJob {
        name: "thought-of-the-day".to_string(),
        expr: thought_config.cron.clone(),
        timezone,
        callback: Arc::new(move || {
            let slack = slack.clone();
            let thought_config = thought_config.clone();
            Box::pin(async move {
                thought::run(&slack, &thought_config)
                    .await
                    .map(|ts| ts.map(|ts| format!("posted ts {}", ts)))
            })
        }),
    };

    Some(Scheduler::new(vec![job]))
}
