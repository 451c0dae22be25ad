//! Upstream relay — forwards gateway requests to the Google endpoints.
//!
//! The relay carries no business logic: it builds the upstream URL,
//! normalizes the nested-array payload into a plain string, and hands TTS
//! bodies back unread so the server can stream them. One pooled
//! `reqwest::Client` keeps connections to the upstream alive across
//! requests.

use serde_json::Value;
use thiserror::Error;

use bhasa_core::payload;
use bhasa_core::types::UpstreamConfig;

/// Failure modes of a single relayed request. Never fatal to the process.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream payload missing expected field")]
    Malformed,
}

#[derive(Clone)]
pub struct Relay {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl Relay {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Romanized English → Nepali through the gtx translation endpoint.
    pub async fn transliterate(&self, text: &str) -> Result<String, RelayError> {
        let url = format!(
            "{}?client=gtx&sl=en&tl=ne&dt=t&q={}",
            self.config.translate_url,
            urlencoding::encode(text)
        );
        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        payload::translation_text(&body).ok_or(RelayError::Malformed)
    }

    /// Phonetic keystrokes → Devanagari through Input Tools.
    pub async fn to_unicode(&self, text: &str) -> Result<String, RelayError> {
        let url = format!(
            "{}?text={}&itc=ne-t-i0-und&num=1&cp=0&cs=1&ie=utf-8&oe=utf-8&app=demopage",
            self.config.input_tools_url,
            urlencoding::encode(text)
        );
        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        payload::suggestion_text(&body).ok_or(RelayError::Malformed)
    }

    /// Start a TTS fetch. The response body is returned unread so callers
    /// can stream it without buffering the whole clip in memory.
    pub async fn tts(&self, text: &str) -> Result<reqwest::Response, RelayError> {
        let url = format!(
            "{}?ie=UTF-8&tl=ne&client=tw-ob&q={}",
            self.config.tts_url,
            urlencoding::encode(text)
        );
        Ok(self.client.get(&url).send().await?.error_for_status()?)
    }
}
