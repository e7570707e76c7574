//! The news workflow: an allowed user adds the configured reaction to a
//! message; the bot fetches it, normalizes its Slack markup, asks the
//! completion API for a one-line headline, and posts it into the thread.

use crate::bus::ReactionAdded;
use crate::config::NewsConfig;
use crate::markup;
use crate::providers::{ChatRequest, CompletionProvider, Message};
use crate::slack::SlackClient;
use crate::workflows::check_allowed_sender;
use anyhow::Result;
use tracing::{debug, info};

/// Run the workflow for one reaction event.
///
/// Returns the ts of the posted summary, or `None` when the event was
/// ignored (wrong reaction, disallowed user, missing message) or the summary
/// was already present in the thread. Only genuine API failures are errors.
pub async fn run(
    slack: &SlackClient,
    provider: &dyn CompletionProvider,
    config: &NewsConfig,
    event: &ReactionAdded,
) -> Result<Option<String>> {
    if event.reaction != config.reaction {
        debug!(
            "Ignoring reaction :{}: (trigger is :{}:)",
            event.reaction, config.reaction
        );
        return Ok(None);
    }

    if !check_allowed_sender(&event.user_id, &config.allow_from) {
        info!("User {} is not allowed to trigger a summary", event.user_id);
        return Ok(None);
    }

    let Some(target) = slack
        .fetch_message(&event.channel_id, &event.message_ts)
        .await?
    else {
        info!("No message found at {}", event.message_ts);
        return Ok(None);
    };

    // The completion API has no notion of Slack markup: normalize first
    let normalized = markup::rewrite(&target.text);
    debug!("Normalized target text: {}", normalized);

    let request = ChatRequest {
        messages: vec![
            Message::system(&config.system_prompt),
            Message::user(normalized),
            Message::system(&config.closing_prompt),
        ],
        model: None,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };
    let summary = provider.chat_with_retry(request, None).await?;

    let thread_ts = target
        .thread_ts
        .clone()
        .unwrap_or_else(|| event.message_ts.clone());

    // Skip posting if an identical reply is already in the thread
    let replies = slack
        .thread_replies(&event.channel_id, &thread_ts)
        .await
        .unwrap_or_default();
    if replies.iter().any(|m| m.text == summary) {
        info!("Skipped summary, already posted: {}", summary);
        return Ok(None);
    }

    let ts = slack
        .post_in_thread(&event.channel_id, &thread_ts, &summary)
        .await?;
    info!(
        "Posted summary in {} thread {} (ts {})",
        event.channel_id, thread_ts, ts
    );
    Ok(Some(ts))
}
