use crate::bus::SlackEvent;
use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Calculate exponential backoff delay for reconnection attempts
pub(crate) fn exponential_backoff_delay(attempt: u32, base_delay_secs: u64, max_delay_secs: u64) -> u64 {
    let delay = (base_delay_secs as f64 * 2.0_f64.powi(attempt as i32)) as u64;
    let capped = delay.min(max_delay_secs);
    // Add up to 25% jitter to avoid thundering herd
    let jitter = (capped as f64 * 0.25 * fastrand::f64()) as u64;
    capped + jitter
}

async fn backoff(attempt: &mut u32) {
    let delay = exponential_backoff_delay(*attempt, 5, 60);
    *attempt += 1;
    warn!("Retrying Slack Socket Mode connection in {} seconds...", delay);
    tokio::time::sleep(tokio::time::Duration::from_secs(delay)).await;
}

/// Request a fresh Socket Mode WebSocket URL from Slack.
async fn open_connection(client: &reqwest::Client, app_token: &str) -> Result<String> {
    let response = client
        .post("https://slack.com/api/apps.connections.open")
        .header("Authorization", format!("Bearer {}", app_token))
        .send()
        .await?;

    let json: Value = response.json().await?;
    if json.get("ok").and_then(Value::as_bool) != Some(true) {
        let error = json
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        if error == "invalid_auth" {
            warn!(
                "Invalid app_token - check that it starts with 'xapp-' and has 'connections:write' scope"
            );
        }
        return Err(anyhow::anyhow!("apps.connections.open error: {}", error));
    }

    json.get("url")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| anyhow::anyhow!("No 'url' field in apps.connections.open response"))
}

/// Spawn the Socket Mode connection task.
///
/// The task runs until aborted: it connects, acknowledges every envelope,
/// forwards decoded events to `inbound_tx`, and reconnects with exponential
/// backoff after any failure or server-initiated close.
pub fn spawn(app_token: String, inbound_tx: mpsc::Sender<SlackEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let mut reconnect_attempt = 0u32;
        loop {
            debug!("Attempting to connect to Slack Socket Mode...");

            let ws_url = match open_connection(&client, &app_token).await {
                Ok(url) => url,
                Err(e) => {
                    error!("Failed to open Socket Mode connection: {}", e);
                    backoff(&mut reconnect_attempt).await;
                    continue;
                }
            };

            let url = match url::Url::parse(&ws_url) {
                Ok(u) => u,
                Err(e) => {
                    error!("Failed to parse WebSocket URL: {}", e);
                    backoff(&mut reconnect_attempt).await;
                    continue;
                }
            };

            match tokio_tungstenite::connect_async(url.as_str()).await {
                Ok((ws_stream, response)) => {
                    info!(
                        "Connected to Slack Socket Mode (status: {})",
                        response.status()
                    );
                    let (mut write, mut read) = ws_stream.split();

                    while let Some(msg) = read.next().await {
                        match msg {
                            Ok(Message::Text(text)) => {
                                let Ok(envelope) = serde_json::from_str::<Value>(&text) else {
                                    continue;
                                };
                                let envelope_type = envelope
                                    .get("type")
                                    .and_then(Value::as_str)
                                    .unwrap_or("");

                                if envelope_type == "hello" {
                                    info!("Received Socket Mode hello message");
                                    continue;
                                }

                                // Every envelope must be acknowledged through the
                                // WebSocket, and within Slack's 3-second window —
                                // so ack before dispatching
                                if let Some(envelope_id) =
                                    envelope.get("envelope_id").and_then(Value::as_str)
                                {
                                    let ack = serde_json::json!({
                                        "envelope_id": envelope_id,
                                        "payload": {}
                                    });
                                    debug!("Acknowledging envelope {}", envelope_id);
                                    if let Err(e) =
                                        write.send(Message::text(ack.to_string())).await
                                    {
                                        error!("Failed to send Socket Mode acknowledgment: {}", e);
                                    }
                                }

                                if let Some(event) = SlackEvent::from_envelope(&envelope)
                                    && let Err(e) = inbound_tx.send(event).await
                                {
                                    error!("Failed to forward Slack event: {}", e);
                                }
                            }
                            Ok(Message::Close(_)) => {
                                info!("Slack Socket Mode connection closed");
                                reconnect_attempt = 0; // Reset on successful connection
                                break;
                            }
                            Ok(Message::Ping(data)) => {
                                if let Err(e) = write.send(Message::Pong(data)).await {
                                    error!("Failed to send Slack WebSocket pong: {}", e);
                                }
                            }
                            Err(e) => {
                                error!("WebSocket error: {}", e);
                                break;
                            }
                            _ => {}
                        }
                    }
                }
                Err(e) => {
                    let error_str = e.to_string();
                    error!("Slack Socket Mode connection error: {}", error_str);
                    if error_str.contains("400") {
                        warn!("400 Bad Request - The token format might be incorrect.");
                        warn!(
                            "Make sure your app_token starts with 'xapp-' and is a Socket Mode token."
                        );
                    } else if error_str.contains("403") {
                        warn!("403 Forbidden - Check that Socket Mode is enabled for the app");
                    }
                    backoff(&mut reconnect_attempt).await;
                }
            }
        }
    })
}
