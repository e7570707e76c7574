use serde_json::Value;

/// A reaction added to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAdded {
    pub reaction: String,
    pub user_id: String,
    pub channel_id: String,
    pub message_ts: String,
}

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub user_id: String,
    pub channel_id: String,
    pub trigger_id: String,
    pub text: String,
}

/// A modal form submission. Carries the raw view payload — each workflow
/// knows how to extract its own fields from the block state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSubmission {
    pub callback_id: String,
    pub user_id: String,
    pub view: Value,
}

/// Typed inbound Slack events, decoded from Socket Mode envelopes and
/// delivered to the dispatcher over the inbound mpsc channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SlackEvent {
    ReactionAdded(ReactionAdded),
    SlashCommand(SlashCommand),
    ViewSubmission(ViewSubmission),
}

impl SlackEvent {
    /// Decode a Socket Mode envelope into a typed event.
    ///
    /// Returns `None` for envelope kinds and inner event types this bot does
    /// not handle (hello, disconnect warnings, message events, block
    /// actions). Acknowledgment is the socket layer's job, not ours.
    pub fn from_envelope(envelope: &Value) -> Option<Self> {
        let envelope_type = envelope.get("type").and_then(Value::as_str)?;
        let payload = envelope.get("payload")?;

        match envelope_type {
            "events_api" => {
                let event = payload.get("event")?;
                if event.get("type").and_then(Value::as_str) != Some("reaction_added") {
                    return None;
                }
                let item = event.get("item")?;
                if item.get("type").and_then(Value::as_str) != Some("message") {
                    return None;
                }
                Some(Self::ReactionAdded(ReactionAdded {
                    reaction: str_field(event, "reaction")?,
                    user_id: str_field(event, "user")?,
                    channel_id: str_field(item, "channel")?,
                    message_ts: str_field(item, "ts")?,
                }))
            }
            "slash_commands" => Some(Self::SlashCommand(SlashCommand {
                command: str_field(payload, "command")?,
                user_id: str_field(payload, "user_id")?,
                channel_id: str_field(payload, "channel_id")?,
                trigger_id: str_field(payload, "trigger_id")?,
                text: str_field(payload, "text").unwrap_or_default(),
            })),
            "interactive" => {
                if payload.get("type").and_then(Value::as_str) != Some("view_submission") {
                    return None;
                }
                let view = payload.get("view")?;
                Some(Self::ViewSubmission(ViewSubmission {
                    callback_id: str_field(view, "callback_id")?,
                    user_id: payload
                        .get("user")
                        .and_then(|u| u.get("id"))
                        .and_then(Value::as_str)
                        .map(ToString::to_string)?,
                    view: view.clone(),
                }))
            }
            _ => None,
        }
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(ToString::to_string)
}
