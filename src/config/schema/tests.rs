use super::*;

#[test]
fn test_default_config_validates() {
    Config::default().validate().unwrap();
}

#[test]
fn test_camel_case_keys_deserialize() {
    let json = r#"{
        "slack": {"botToken": "xoxb-1", "appToken": "xapp-1"},
        "openai": {"apiKey": "sk-test", "model": "gpt-4o"},
        "backend": {"url": "https://api.example.com/praise", "token": "secret"},
        "workflows": {
            "news": {"reaction": "jp", "allowFrom": ["U1", "U2"]},
            "thought": {"enabled": true, "channelId": "C123", "cron": "0 9 * * 1"}
        }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.slack.bot_token, "xoxb-1");
    assert_eq!(config.slack.app_token, "xapp-1");
    assert_eq!(config.openai.api_key, "sk-test");
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.workflows.news.reaction, "jp");
    assert_eq!(config.workflows.news.allow_from, vec!["U1", "U2"]);
    assert_eq!(config.workflows.thought.channel_id, "C123");
}

#[test]
fn test_defaults_fill_missing_sections() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.openai.model, "gpt-3.5-turbo-1106");
    assert_eq!(config.workflows.news.reaction, "newspaper");
    assert_eq!(config.workflows.kudos.command, "/kudos");
    assert!(!config.workflows.thought.enabled);
    assert!(!config.workflows.thought.thoughts.is_empty());
}

#[test]
fn test_serialization_emits_camel_case() {
    let config = Config::default();
    let value = serde_json::to_value(&config).unwrap();
    assert!(value["slack"].get("botToken").is_some());
    assert!(value["openai"].get("apiKey").is_some());
    assert!(value["workflows"]["news"].get("allowFrom").is_some());
}

#[test]
fn test_debug_redacts_secrets() {
    let config = Config {
        slack: SlackConfig {
            bot_token: "xoxb-secret".to_string(),
            app_token: String::new(),
        },
        openai: OpenAIConfig {
            api_key: "sk-secret".to_string(),
            ..Default::default()
        },
        backend: BackendConfig {
            url: "https://api.example.com".to_string(),
            token: "backend-secret".to_string(),
        },
        ..Default::default()
    };
    let debug = format!("{:?}", config);
    assert!(!debug.contains("xoxb-secret"));
    assert!(!debug.contains("sk-secret"));
    assert!(!debug.contains("backend-secret"));
    assert!(debug.contains("[REDACTED]"));
    assert!(debug.contains("[empty]"));
    // Non-secret fields still print
    assert!(debug.contains("https://api.example.com"));
}

#[test]
fn test_validate_rejects_empty_reaction() {
    let mut config = Config::default();
    config.workflows.news.reaction = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_slash_command() {
    let mut config = Config::default();
    config.workflows.kudos.command = "kudos".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_cron() {
    let mut config = Config::default();
    config.workflows.thought.enabled = true;
    config.workflows.thought.cron = "not a cron".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_timezone() {
    let mut config = Config::default();
    config.workflows.thought.enabled = true;
    config.workflows.thought.timezone = "Mars/Olympus".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_accepts_real_timezone() {
    let mut config = Config::default();
    config.workflows.thought.enabled = true;
    config.workflows.thought.timezone = "America/New_York".to_string();
    config.validate().unwrap();
}
