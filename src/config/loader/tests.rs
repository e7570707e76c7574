use super::*;

#[test]
fn test_load_missing_file_returns_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.workflows.news.reaction, "newspaper");
}

#[test]
fn test_save_and_reload_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");

    let mut config = Config::default();
    config.slack.bot_token = "xoxb-roundtrip".to_string();
    config.workflows.news.allow_from = vec!["U42".to_string()];
    save_config(&config, Some(&path)).unwrap();

    let loaded = load_config(Some(&path)).unwrap();
    assert_eq!(loaded.slack.bot_token, "xoxb-roundtrip");
    assert_eq!(loaded.workflows.news.allow_from, vec!["U42"]);
}

#[test]
fn test_load_rejects_invalid_json() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_config(Some(&path)).is_err());
}

#[test]
fn test_load_rejects_invalid_config() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"workflows": {"kudos": {"command": "no-slash"}}}"#,
    )
    .unwrap();
    assert!(load_config(Some(&path)).is_err());
}

#[cfg(unix)]
#[test]
fn test_save_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    save_config(&Config::default(), Some(&path)).unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
