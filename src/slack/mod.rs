pub mod socket;

use crate::utils::regex::RegexPatterns;
use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://slack.com/api";
const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A message fetched from a conversation.
#[derive(Debug, Clone)]
pub struct SlackMessage {
    pub text: String,
    pub thread_ts: Option<String>,
}

/// Thin wrapper over the Slack Web API: form-encoded POSTs with the bot
/// token, `ok` checking, and the handful of methods the workflows need.
pub struct SlackClient {
    bot_token: String,
    base_url: String,
    client: reqwest::Client,
}

impl SlackClient {
    pub fn new(bot_token: String) -> Self {
        Self::with_base_url(bot_token, API_BASE.to_string())
    }

    pub fn with_base_url(bot_token: String, base_url: String) -> Self {
        Self {
            bot_token,
            base_url,
            client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Convert common markdown to Slack mrkdwn before posting.
    pub fn format_for_slack(text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        // Slack uses *bold* not **bold**
        let text = RegexPatterns::markdown_bold().replace_all(text, r"*$1*");
        // Slack uses ~strike~ not ~~strike~~
        let text = RegexPatterns::markdown_strike().replace_all(&text, r"~$1~");
        // Slack links: [text](url) -> <url|text>
        let re_link = RegexPatterns::markdown_link();
        re_link.replace_all(&text, r"<$2|$1>").to_string()
    }

    async fn call(&self, method: &str, params: &HashMap<&str, Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, method);
        let mut form = params.clone();
        form.insert("token", Value::String(self.bot_token.clone()));

        let response = self.client.post(&url).form(&form).send().await?;

        let json: Value = response.json().await?;
        if json.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = json
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(crate::errors::OtterbotError::Slack(error.to_string()).into());
        }
        Ok(json)
    }

    /// Verify the bot token and return (user name, user id).
    pub async fn auth_test(&self) -> Result<(String, String)> {
        let json = self.call("auth.test", &HashMap::new()).await?;
        let user = json
            .get("user")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let user_id = json
            .get("user_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok((user, user_id))
    }

    /// Post a message to a channel. Returns the message ts.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<String> {
        self.post_inner(channel, None, text).await
    }

    /// Post a reply into a thread. Returns the message ts.
    pub async fn post_in_thread(
        &self,
        channel: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<String> {
        self.post_inner(channel, Some(thread_ts), text).await
    }

    async fn post_inner(
        &self,
        channel: &str,
        thread_ts: Option<&str>,
        text: &str,
    ) -> Result<String> {
        let content = Self::format_for_slack(text);
        let mut params = HashMap::new();
        params.insert("channel", Value::String(channel.to_string()));
        params.insert("text", Value::String(content));
        params.insert("mrkdwn", Value::Bool(true));
        if let Some(ts) = thread_ts {
            params.insert("thread_ts", Value::String(ts.to_string()));
        }
        let json = self.call("chat.postMessage", &params).await?;
        Ok(json
            .get("ts")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Fetch a single message by channel and ts.
    ///
    /// Returns `Ok(None)` when no message exists at that ts. A
    /// `channel_not_found`-style error usually means the bot's user has not
    /// been invited to the channel; the error message says so.
    pub async fn fetch_message(&self, channel: &str, ts: &str) -> Result<Option<SlackMessage>> {
        let mut params = HashMap::new();
        params.insert("channel", Value::String(channel.to_string()));
        params.insert("ts", Value::String(ts.to_string()));
        params.insert("limit", Value::String("1".to_string()));
        params.insert("inclusive", Value::Bool(true));

        let json = self.call("conversations.replies", &params).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to fetch the message due to {}. Perhaps, you need to invite this app's bot user to the channel.",
                e
            )
        })?;

        Ok(parse_messages(&json).into_iter().next())
    }

    /// Fetch all replies in a thread (including the root message).
    pub async fn thread_replies(&self, channel: &str, thread_ts: &str) -> Result<Vec<SlackMessage>> {
        let mut params = HashMap::new();
        params.insert("channel", Value::String(channel.to_string()));
        params.insert("ts", Value::String(thread_ts.to_string()));

        let json = self.call("conversations.replies", &params).await?;
        Ok(parse_messages(&json))
    }

    /// Open a modal view for the given interaction trigger.
    pub async fn open_view(&self, trigger_id: &str, view: &Value) -> Result<()> {
        let mut params = HashMap::new();
        params.insert("trigger_id", Value::String(trigger_id.to_string()));
        params.insert("view", Value::String(view.to_string()));
        self.call("views.open", &params).await?;
        debug!("Opened modal view for trigger {}", trigger_id);
        Ok(())
    }
}

fn parse_messages(json: &Value) -> Vec<SlackMessage> {
    json.get("messages")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .map(|m| SlackMessage {
                    text: m
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    thread_ts: m
                        .get("thread_ts")
                        .and_then(Value::as_str)
                        .map(ToString::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests;
