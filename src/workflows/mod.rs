pub mod kudos;
pub mod news;
pub mod thought;

use crate::backend::PraiseClient;
use crate::bus::SlackEvent;
use crate::config::WorkflowsConfig;
use crate::providers::CompletionProvider;
use crate::slack::SlackClient;
use indexmap::IndexSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Check if a sender is allowed based on an allow list.
///
/// `"*"` is an explicit wildcard allowing everyone. Otherwise the sender must
/// match an entry after normalization. An empty list denies everyone.
pub fn check_allowed_sender(sender: &str, allow_list: &[String]) -> bool {
    if allow_list.iter().any(|a| a == "*") {
        return true;
    }
    let normalized_sender = normalize_sender_id(sender);
    allow_list
        .iter()
        .any(|allowed| normalized_sender == normalize_sender_id(allowed))
}

/// Normalize a sender ID: strip control characters to prevent injection.
pub fn normalize_sender_id(sender: &str) -> String {
    sender.trim().chars().filter(|c| !c.is_control()).collect()
}

/// Routes decoded Slack events to the workflow handlers.
///
/// Handler errors are logged, never propagated — one failing event must not
/// take down the dispatch loop.
pub struct Dispatcher {
    slack: Arc<SlackClient>,
    provider: Option<Arc<dyn CompletionProvider>>,
    backend: Option<PraiseClient>,
    config: WorkflowsConfig,
    bot_user_id: Option<String>,
    seen_reactions: Mutex<IndexSet<String>>,
}

impl Dispatcher {
    pub fn new(
        slack: Arc<SlackClient>,
        provider: Option<Arc<dyn CompletionProvider>>,
        backend: Option<PraiseClient>,
        config: WorkflowsConfig,
        bot_user_id: Option<String>,
    ) -> Self {
        Self {
            slack,
            provider,
            backend,
            config,
            bot_user_id,
            seen_reactions: Mutex::new(IndexSet::new()),
        }
    }

    pub async fn handle(&self, event: SlackEvent) {
        match event {
            SlackEvent::ReactionAdded(reaction) => {
                if self.bot_user_id.as_deref() == Some(reaction.user_id.as_str()) {
                    debug!("Ignoring reaction from the bot itself");
                    return;
                }

                // Slack redelivers envelopes that were not acked in time;
                // drop exact repeats
                let key = format!(
                    "{}:{}:{}:{}",
                    reaction.channel_id, reaction.message_ts, reaction.user_id, reaction.reaction
                );
                {
                    let mut seen = self.seen_reactions.lock().await;
                    if seen.contains(&key) {
                        debug!("Ignoring duplicate reaction event: {}", key);
                        return;
                    }
                    seen.insert(key);
                    // Evict oldest entries when the set grows too large.
                    // IndexSet preserves insertion order, so drain from the front.
                    if seen.len() > 1000 {
                        let drain_count = seen.len() - 500;
                        seen.drain(..drain_count);
                        debug!("Pruned reaction dedup set to {} entries", seen.len());
                    }
                }

                if !self.config.news.enabled {
                    return;
                }
                let Some(ref provider) = self.provider else {
                    debug!("News workflow has no completion provider, skipping");
                    return;
                };
                if let Err(e) =
                    news::run(&self.slack, provider.as_ref(), &self.config.news, &reaction).await
                {
                    error!("News workflow failed: {}", e);
                }
            }
            SlackEvent::SlashCommand(cmd) => {
                if !self.config.kudos.enabled || cmd.command != self.config.kudos.command {
                    debug!("Ignoring slash command {}", cmd.command);
                    return;
                }
                info!("Opening kudos form for {}", cmd.user_id);
                if let Err(e) = kudos::open_form(&self.slack, &cmd.trigger_id).await {
                    error!("Failed to open kudos form: {}", e);
                }
            }
            SlackEvent::ViewSubmission(submission) => {
                if submission.callback_id != kudos::CALLBACK_ID {
                    debug!("Ignoring view submission {}", submission.callback_id);
                    return;
                }
                let parsed =
                    match kudos::KudosSubmission::from_view(&submission.user_id, &submission.view) {
                        Ok(parsed) => parsed,
                        Err(e) => {
                            error!("Malformed kudos submission: {}", e);
                            return;
                        }
                    };
                if let Err(e) = kudos::run(&self.slack, self.backend.as_ref(), &parsed).await {
                    error!("Kudos workflow failed: {}", e);
                }
            }
        }
    }
}
