//! The kudos workflow: a slash command opens a modal form; submitting it
//! saves the praise to the backend store and posts a kudos message (with a
//! vibe-matched GIF) into the chosen channel.

pub mod gifs;

use crate::backend::{Praise, PraiseClient};
use crate::slack::SlackClient;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::{info, warn};

pub const CALLBACK_ID: &str = "give_kudos";

/// The six vibes offered by the form, in display order.
pub const VIBES: [&str; 6] = [
    "Appreciation for someone 🫂",
    "Celebrating a victory 🏆",
    "Thankful for great teamwork ⚽️",
    "Amazed at awesome work ☄️",
    "Excited for the future 🎉",
    "No vibes, just plants 🪴",
];

/// Build the kudos modal view.
pub fn build_modal() -> Value {
    let vibe_options: Vec<Value> = VIBES
        .iter()
        .map(|vibe| {
            json!({
                "text": {"type": "plain_text", "text": vibe},
                "value": vibe
            })
        })
        .collect();

    json!({
        "type": "modal",
        "callback_id": CALLBACK_ID,
        "title": {"type": "plain_text", "text": "Give someone kudos"},
        "submit": {"type": "plain_text", "text": "Share"},
        "blocks": [
            {
                "type": "input",
                "block_id": "doer",
                "label": {"type": "plain_text", "text": "Whose deeds are deemed worthy of a kudo?"},
                "element": {"type": "users_select", "action_id": "doer_select"}
            },
            {
                "type": "input",
                "block_id": "channel",
                "label": {"type": "plain_text", "text": "Where should this message be shared?"},
                "element": {"type": "channels_select", "action_id": "channel_select"}
            },
            {
                "type": "input",
                "block_id": "message",
                "label": {"type": "plain_text", "text": "What would you like to say?"},
                "element": {
                    "type": "plain_text_input",
                    "action_id": "message_input",
                    "multiline": true
                }
            },
            {
                "type": "input",
                "block_id": "vibe",
                "optional": true,
                "label": {"type": "plain_text", "text": "What is this kudo's \"vibe\"?"},
                "element": {
                    "type": "static_select",
                    "action_id": "vibe_select",
                    "options": vibe_options
                }
            }
        ]
    })
}

/// Open the kudos form in response to the slash command.
pub async fn open_form(slack: &SlackClient, trigger_id: &str) -> Result<()> {
    slack.open_view(trigger_id, &build_modal()).await
}

/// The parsed form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KudosSubmission {
    pub sender: String,
    pub receiver: String,
    pub channel: String,
    pub message: String,
    pub vibe: Option<String>,
}

impl KudosSubmission {
    /// Extract the form fields from a `view_submission` view payload.
    pub fn from_view(sender: &str, view: &Value) -> Result<Self> {
        let values = view
            .get("state")
            .and_then(|s| s.get("values"))
            .context("view submission has no state values")?;

        let receiver = values["doer"]["doer_select"]["selected_user"]
            .as_str()
            .context("kudos submission missing recipient")?;
        let channel = values["channel"]["channel_select"]["selected_channel"]
            .as_str()
            .context("kudos submission missing channel")?;
        let message = values["message"]["message_input"]["value"]
            .as_str()
            .context("kudos submission missing message")?;
        let vibe = values["vibe"]["vibe_select"]["selected_option"]["value"]
            .as_str()
            .map(ToString::to_string);

        Ok(Self {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            channel: channel.to_string(),
            message: message.to_string(),
            vibe,
        })
    }
}

/// Format the kudos message posted into the channel.
pub fn format_kudos_message(receiver: &str, message: &str, gif_url: Option<&str>) -> String {
    let mut text = format!(
        "*Hey <@{}>!* Someone wanted to share some kind words with you :otter:\n> {}",
        receiver, message
    );
    if let Some(url) = gif_url {
        text.push_str(&format!("\n<{}>", url));
    }
    text
}

/// Run the kudos workflow for a parsed submission. Returns the posted ts.
pub async fn run(
    slack: &SlackClient,
    backend: Option<&PraiseClient>,
    submission: &KudosSubmission,
) -> Result<String> {
    let gif = gifs::pick_gif(submission.vibe.as_deref().unwrap_or(""));
    let gif_url = gif.map(|g| g.url.as_str());

    // Persist to the praise store first. A backend outage must not eat the
    // kudos itself, so failures are logged and the post still happens.
    if let Some(backend) = backend {
        let praise = Praise {
            praise_sender: submission.sender.clone(),
            praise_receiver: submission.receiver.clone(),
            praise_channel: submission.channel.clone(),
            praise_message: submission.message.clone(),
            praise_gif: gif_url.map(ToString::to_string),
        };
        match backend.save(&praise).await {
            Ok(_) => info!("Saved praise from {} to backend", submission.sender),
            Err(e) => warn!("Failed to save praise to backend: {}", e),
        }
    }

    let text = format_kudos_message(&submission.receiver, &submission.message, gif_url);
    let ts = slack.post_message(&submission.channel, &text).await?;
    info!(
        "Posted kudos for {} in {} (ts {})",
        submission.receiver, submission.channel, ts
    );
    Ok(ts)
}

#[cfg(test)]
mod tests;
