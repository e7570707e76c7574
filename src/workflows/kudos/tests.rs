use super::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_view() -> Value {
    json!({
        "callback_id": "give_kudos",
        "state": {
            "values": {
                "doer": {"doer_select": {"type": "users_select", "selected_user": "U2"}},
                "channel": {"channel_select": {"type": "channels_select", "selected_channel": "C5"}},
                "message": {"message_input": {"type": "plain_text_input", "value": "Shipped it!"}},
                "vibe": {"vibe_select": {"type": "static_select", "selected_option": {
                    "value": "Celebrating a victory 🏆"
                }}}
            }
        }
    })
}

#[test]
fn test_energy_for_each_vibe() {
    assert_eq!(gifs::energy_for_vibe("Appreciation for someone 🫂"), "appreciation");
    assert_eq!(gifs::energy_for_vibe("Celebrating a victory 🏆"), "celebration");
    assert_eq!(gifs::energy_for_vibe("Thankful for great teamwork ⚽️"), "thankful");
    assert_eq!(gifs::energy_for_vibe("Amazed at awesome work ☄️"), "amazed");
    assert_eq!(gifs::energy_for_vibe("Excited for the future 🎉"), "excited");
    assert_eq!(gifs::energy_for_vibe("No vibes, just plants 🪴"), "plants");
}

#[test]
fn test_unknown_vibe_gets_otters() {
    assert_eq!(gifs::energy_for_vibe(""), "otter");
    assert_eq!(gifs::energy_for_vibe("Something else"), "otter");
}

#[test]
fn test_pick_gif_matches_energy_tag() {
    for vibe in VIBES {
        let gif = gifs::pick_gif(vibe).expect("catalog covers every vibe");
        let energy = gifs::energy_for_vibe(vibe);
        assert!(
            gif.tags.iter().any(|t| t == energy),
            "gif {:?} lacks tag {}",
            gif.url,
            energy
        );
    }
}

#[test]
fn test_pick_gif_unknown_vibe_returns_otter_gif() {
    let gif = gifs::pick_gif("").unwrap();
    assert!(gif.tags.iter().any(|t| t == "otter"));
}

#[test]
fn test_from_view_extracts_fields() {
    let submission = KudosSubmission::from_view("U1", &sample_view()).unwrap();
    assert_eq!(
        submission,
        KudosSubmission {
            sender: "U1".to_string(),
            receiver: "U2".to_string(),
            channel: "C5".to_string(),
            message: "Shipped it!".to_string(),
            vibe: Some("Celebrating a victory 🏆".to_string()),
        }
    );
}

#[test]
fn test_from_view_vibe_is_optional() {
    let mut view = sample_view();
    view["state"]["values"]
        .as_object_mut()
        .unwrap()
        .remove("vibe");
    let submission = KudosSubmission::from_view("U1", &view).unwrap();
    assert!(submission.vibe.is_none());
}

#[test]
fn test_from_view_missing_message_is_error() {
    let mut view = sample_view();
    view["state"]["values"]
        .as_object_mut()
        .unwrap()
        .remove("message");
    assert!(KudosSubmission::from_view("U1", &view).is_err());
}

#[test]
fn test_modal_declares_callback_and_blocks() {
    let modal = build_modal();
    assert_eq!(modal["callback_id"], "give_kudos");
    let blocks = modal["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(modal["blocks"][3]["element"]["options"].as_array().unwrap().len(), 6);
}

#[test]
fn test_format_kudos_message() {
    let text = format_kudos_message("U2", "Shipped it!", Some("https://gif.example/x.gif"));
    assert_eq!(
        text,
        "*Hey <@U2>!* Someone wanted to share some kind words with you :otter:\n\
         > Shipped it!\n\
         <https://gif.example/x.gif>"
    );
}

#[test]
fn test_format_kudos_message_without_gif() {
    let text = format_kudos_message("U2", "Nice!", None);
    assert!(!text.contains("\n<"));
    assert!(text.contains("<@U2>"));
}

#[tokio::test]
async fn test_run_posts_kudos_and_saves_praise() {
    let slack_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(body_string_contains("Shipped+it%21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "ts": "9.9"})))
        .expect(1)
        .mount(&slack_server)
        .await;

    let backend_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/praise"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ts": "9.9"})))
        .expect(1)
        .mount(&backend_server)
        .await;

    let slack = SlackClient::with_base_url("xoxb-test".to_string(), slack_server.uri());
    let backend = PraiseClient::new(format!("{}/praise", backend_server.uri()), "k".to_string());
    let submission = KudosSubmission::from_view("U1", &sample_view()).unwrap();

    let ts = run(&slack, Some(&backend), &submission).await.unwrap();
    assert_eq!(ts, "9.9");
}

#[tokio::test]
async fn test_run_still_posts_when_backend_fails() {
    let slack_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "ts": "9.8"})))
        .expect(1)
        .mount(&slack_server)
        .await;

    let backend_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/praise"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&backend_server)
        .await;

    let slack = SlackClient::with_base_url("xoxb-test".to_string(), slack_server.uri());
    let backend = PraiseClient::new(format!("{}/praise", backend_server.uri()), "k".to_string());
    let submission = KudosSubmission::from_view("U1", &sample_view()).unwrap();

    let ts = run(&slack, Some(&backend), &submission).await.unwrap();
    assert_eq!(ts, "9.8");
}

#[tokio::test]
async fn test_run_without_backend_configured() {
    let slack_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "ts": "9.7"})))
        .expect(1)
        .mount(&slack_server)
        .await;

    let slack = SlackClient::with_base_url("xoxb-test".to_string(), slack_server.uri());
    let submission = KudosSubmission::from_view("U1", &sample_view()).unwrap();

    run(&slack, None, &submission).await.unwrap();
}
