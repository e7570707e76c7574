//! The thought-of-the-day workflow: pick a random thought from the
//! configured list and post it to the configured channel. Fired by the
//! scheduler, or on demand from the CLI.

use crate::config::ThoughtConfig;
use crate::slack::SlackClient;
use anyhow::Result;
use tracing::{info, warn};

/// Pick a uniformly random thought. `None` when the list is empty.
pub fn pick(thoughts: &[String]) -> Option<&String> {
    if thoughts.is_empty() {
        return None;
    }
    Some(&thoughts[fastrand::usize(..thoughts.len())])
}

/// Post one thought. Returns the posted ts, or `None` when the workflow is
/// not configured well enough to post (empty list or channel).
pub async fn run(slack: &SlackClient, config: &ThoughtConfig) -> Result<Option<String>> {
    if config.channel_id.is_empty() {
        warn!("Thought workflow has no channelId configured, skipping");
        return Ok(None);
    }
    let Some(thought) = pick(&config.thoughts) else {
        warn!("Thought workflow has no thoughts configured, skipping");
        return Ok(None);
    };

    let ts = slack.post_message(&config.channel_id, thought).await?;
    info!("Posted thought to {} (ts {})", config.channel_id, ts);
    Ok(Some(ts))
}
