//! Gateway client — the pipeline's real transport.
//!
//! Talks to a running bhasa relay over HTTP. Transport failures become
//! [`Resolution::Failed`], a response missing its `result` field becomes
//! [`Resolution::NoResult`] (warned, never surfaced), and a fired
//! cancellation token short-circuits to [`Resolution::Cancelled`] so
//! callers never have to string-match error text.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use bhasa_core::types::{ErrorResponse, GatewayConfig, Resolution, Scheme, TextRequest};

use crate::transport::Transport;

#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    client: reqwest::Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch relayed TTS audio for `text`. Fully buffered; playback
    /// wants the whole clip.
    pub async fn fetch_audio(&self, text: &str) -> Result<Vec<u8>, reqwest::Error> {
        let url = format!(
            "{}/api/tts?text={}",
            self.base_url,
            urlencoding::encode(text)
        );
        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for GatewayClient {
    async fn fetch(&self, scheme: Scheme, text: &str, cancel: &CancellationToken) -> Resolution {
        let url = format!("{}{}", self.base_url, scheme.endpoint());
        let request = self
            .client
            .post(&url)
            .json(&TextRequest {
                text: text.to_string(),
            })
            .send();

        let response = tokio::select! {
            _ = cancel.cancelled() => return Resolution::Cancelled,
            response = request => response,
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!("gateway request failed: {e}");
                return Resolution::Failed(e.to_string());
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.details.unwrap_or(body.error),
                Err(_) => format!("gateway returned {status}"),
            };
            error!("gateway error ({status}): {message}");
            return Resolution::Failed(message);
        }

        let body = tokio::select! {
            _ = cancel.cancelled() => return Resolution::Cancelled,
            body = response.json::<serde_json::Value>() => body,
        };

        match body {
            Ok(value) => match value.get("result").and_then(|v| v.as_str()) {
                Some(result) => Resolution::Done(result.to_string()),
                None => {
                    warn!("gateway response missing result field");
                    Resolution::NoResult
                }
            },
            Err(e) => {
                error!("gateway returned unreadable body: {e}");
                Resolution::Failed(e.to_string())
            }
        }
    }
}
