use crate::errors::OtterbotError;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A praise record saved to the backend store.
#[derive(Debug, Clone, Serialize)]
pub struct Praise {
    pub praise_sender: String,
    pub praise_receiver: String,
    pub praise_channel: String,
    pub praise_message: String,
    pub praise_gif: Option<String>,
}

/// REST client for the praise backend: a single JSON POST endpoint
/// authenticated with an `X-Api-Key` header.
pub struct PraiseClient {
    url: String,
    api_key: String,
    client: Client,
}

impl PraiseClient {
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            url,
            api_key,
            client: Client::builder()
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// Save a praise. Returns the backend's response body.
    pub async fn save(&self, praise: &Praise) -> Result<Value> {
        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("X-Api-Key", &self.api_key)
            .json(praise)
            .send()
            .await
            .context("Failed to reach praise backend")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OtterbotError::Backend(format!(
                "saving the praise failed (status: {}, body: {})",
                status, body
            ))
            .into());
        }

        resp.json()
            .await
            .context("Failed to parse praise backend response")
    }
}
