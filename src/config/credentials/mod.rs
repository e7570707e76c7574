use super::schema::Config;

macro_rules! define_credentials {
    ($( $name:literal, $env:literal => $($path:ident).+ );* $(;)?) => {
        /// (slot name, env var name) pairs.
        pub const CREDENTIAL_ENV_VARS: &[(&str, &str)] = &[$(($name, $env)),*];

        /// Apply environment variable overrides.
        ///
        /// Any `OTTERBOT_*` env var that is set and non-empty will overwrite
        /// the corresponding config field, allowing secrets to be injected
        /// without touching the config file (useful for containers and CI).
        pub fn apply_env_overrides(config: &mut Config) {
            $(
                if let Ok(val) = std::env::var($env) {
                    if !val.is_empty() {
                        config.$($path).+ = val;
                    }
                }
            )*
        }
    };
}

define_credentials! {
    "slack-bot-token", "OTTERBOT_SLACK_BOT_TOKEN" => slack.bot_token;
    "slack-app-token", "OTTERBOT_SLACK_APP_TOKEN" => slack.app_token;
    "openai-api-key",  "OTTERBOT_OPENAI_API_KEY"  => openai.api_key;
    "backend-token",   "OTTERBOT_BACKEND_TOKEN"   => backend.token;
}
