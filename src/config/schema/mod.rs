use serde::{Deserialize, Serialize};

/// Generates a `Debug` impl that redacts secret fields.
///
/// Field specifiers:
/// - `field_name`         — printed normally via `&self.field_name`
/// - `redact(field_name)` — `String` field: shows `[empty]` or `[REDACTED]`
macro_rules! redact_debug {
    // Internal: emit a single .field() call
    (@field $builder:ident, $self:ident, redact($field:ident)) => {
        $builder.field(
            stringify!($field),
            &if $self.$field.is_empty() {
                "[empty]"
            } else {
                "[REDACTED]"
            },
        );
    };
    (@field $builder:ident, $self:ident, $field:ident) => {
        $builder.field(stringify!($field), &$self.$field);
    };

    // Internal: recursive TT muncher
    (@fields $builder:ident, $self:ident,) => {};
    (@fields $builder:ident, $self:ident, redact($field:ident), $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, redact($field));
        redact_debug!(@fields $builder, $self, $($rest)*);
    };
    (@fields $builder:ident, $self:ident, $field:ident, $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, $field);
        redact_debug!(@fields $builder, $self, $($rest)*);
    };

    // Entry point
    ($struct_name:ident, $($fields:tt)*) => {
        impl std::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut builder = f.debug_struct(stringify!($struct_name));
                redact_debug!(@fields builder, self, $($fields)*);
                builder.finish()
            }
        }
    };
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Slack
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct SlackConfig {
    #[serde(default, rename = "botToken")]
    pub bot_token: String,
    #[serde(default, rename = "appToken")]
    pub app_token: String,
}

redact_debug!(SlackConfig, redact(bot_token), redact(app_token),);

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

fn default_openai_model() -> String {
    "gpt-3.5-turbo-1106".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base", rename = "apiBase")]
    pub api_base: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_openai_model(),
            api_base: default_openai_base(),
        }
    }
}

redact_debug!(OpenAIConfig, redact(api_key), model, api_base,);

// ---------------------------------------------------------------------------
// Praise backend
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// POST endpoint for saving praises. Empty disables persistence.
    #[serde(default)]
    pub url: String,
    /// Sent as the `X-Api-Key` header.
    #[serde(default)]
    pub token: String,
}

redact_debug!(BackendConfig, url, redact(token),);

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

fn default_news_reaction() -> String {
    "newspaper".to_string()
}

fn default_news_system_prompt() -> String {
    "You are a news writer summarizing a news article as a single title that is less than 10 words"
        .to_string()
}

fn default_news_closing_prompt() -> String {
    "The title of the article with no quotes and no other characters like backslashes surrounding it is:"
        .to_string()
}

fn default_news_max_tokens() -> u32 {
    256
}

fn default_news_temperature() -> f32 {
    0.7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reaction emoji name (without colons) that triggers a summary.
    #[serde(default = "default_news_reaction")]
    pub reaction: String,
    /// User IDs allowed to trigger the workflow. `"*"` allows everyone.
    #[serde(default, rename = "allowFrom")]
    pub allow_from: Vec<String>,
    #[serde(default = "default_news_system_prompt", rename = "systemPrompt")]
    pub system_prompt: String,
    #[serde(default = "default_news_closing_prompt", rename = "closingPrompt")]
    pub closing_prompt: String,
    #[serde(default = "default_news_max_tokens", rename = "maxTokens")]
    pub max_tokens: u32,
    #[serde(default = "default_news_temperature")]
    pub temperature: f32,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reaction: default_news_reaction(),
            allow_from: Vec::new(),
            system_prompt: default_news_system_prompt(),
            closing_prompt: default_news_closing_prompt(),
            max_tokens: default_news_max_tokens(),
            temperature: default_news_temperature(),
        }
    }
}

fn default_kudos_command() -> String {
    "/kudos".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KudosConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Slash command that opens the kudos form.
    #[serde(default = "default_kudos_command")]
    pub command: String,
}

impl Default for KudosConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_kudos_command(),
        }
    }
}

fn default_thought_cron() -> String {
    // Monday mornings
    "0 9 * * MON".to_string()
}

fn default_thoughts() -> Vec<String> {
    vec![
        "Small improvements compound: ship the one-line fix today.".to_string(),
        "Write the message you would want to receive.".to_string(),
        "Celebrate the boring wins; they keep the lights on.".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Channel the scheduled thought is posted to.
    #[serde(default, rename = "channelId")]
    pub channel_id: String,
    /// 5-field (minute-resolution) or 6-field cron expression.
    #[serde(default = "default_thought_cron")]
    pub cron: String,
    /// IANA timezone for the schedule. Empty uses the system timezone.
    #[serde(default)]
    pub timezone: String,
    #[serde(default = "default_thoughts")]
    pub thoughts: Vec<String>,
}

impl Default for ThoughtConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_id: String::new(),
            cron: default_thought_cron(),
            timezone: String::new(),
            thoughts: default_thoughts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkflowsConfig {
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub kudos: KudosConfig,
    #[serde(default)]
    pub thought: ThoughtConfig,
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub openai: OpenAIConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub workflows: WorkflowsConfig,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workflows.news.enabled && self.workflows.news.reaction.is_empty() {
            anyhow::bail!("workflows.news.reaction must not be empty");
        }
        if self.workflows.kudos.enabled && !self.workflows.kudos.command.starts_with('/') {
            anyhow::bail!(
                "workflows.kudos.command must start with '/' (got '{}')",
                self.workflows.kudos.command
            );
        }
        if self.workflows.thought.enabled {
            crate::scheduler::validate_cron_expr(&self.workflows.thought.cron)?;
            if !self.workflows.thought.timezone.is_empty()
                && self.workflows.thought.timezone.parse::<chrono_tz::Tz>().is_err()
            {
                anyhow::bail!(
                    "workflows.thought.timezone '{}' is not a valid IANA timezone",
                    self.workflows.thought.timezone
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
