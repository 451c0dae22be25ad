//! Shared types for the bhasa gateway and input pipeline.

use serde::{Deserialize, Serialize};

// ─── Pipeline types ────────────────────────────────────────────────────────

/// Which transliteration scheme a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Full romanized-English to Nepali translation.
    Romanized,
    /// Phonetic keystrokes to Unicode Devanagari (input tools).
    Unicode,
}

impl Scheme {
    /// Gateway endpoint path serving this scheme.
    pub fn endpoint(self) -> &'static str {
        match self {
            Scheme::Romanized => "/api/transliterate",
            Scheme::Unicode => "/api/unicode",
        }
    }
}

/// Outcome of resolving a query through the transport.
///
/// A superseded request renders nothing, and a malformed upstream
/// payload is dropped after a warning rather than shown to the user;
/// neither is a `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved text, ready to render. May legitimately be empty.
    Done(String),
    /// The request was superseded before completion.
    Cancelled,
    /// The upstream answered but without a usable result field.
    NoResult,
    /// Transport-level failure with a displayable message.
    Failed(String),
}

// ─── Configuration ─────────────────────────────────────────────────────────

/// Base URLs of the unofficial Google endpoints the relay forwards to.
///
/// Overridable so tests can point the relay at a local mock server.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub translate_url: String,
    pub input_tools_url: String,
    pub tts_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            translate_url: "https://translate.googleapis.com/translate_a/single".into(),
            input_tools_url: "https://inputtools.google.com/request".into(),
            tts_url: "https://translate.google.com/translate_tts".into(),
        }
    }
}

/// Client-side location of a running bhasa gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
        }
    }
}

// ─── Wire types ────────────────────────────────────────────────────────────

/// Body of `POST /api/transliterate` and `POST /api/unicode`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

/// Success body of both POST endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: String,
}

/// Error body of both POST endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
