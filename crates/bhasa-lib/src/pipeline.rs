//! Live input pipeline — debounce → cache → cancellable fetch → render.
//!
//! ```text
//! submit("kath", 300ms) → debounce timer (supersedes the previous timer)
//!     → resolve: cache hit  → Done(cached), no network
//!                cache miss → cancel previous fetch, fetch with fresh token
//!     → render:  Done   → output field (empty string is a real update)
//!                Failed → prefixed error message
//!                Cancelled / NoResult → no update
//! ```
//!
//! One pipeline instance owns its cache and its in-flight token; nothing is
//! process-global, so independent input surfaces get independent pipelines.
//! Each new fetch cancels its predecessor's token, which guarantees a
//! superseded response can never overwrite the output field: only the most
//! recently issued request that is allowed to complete may render.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use bhasa_core::query::Query;
use bhasa_core::types::{Resolution, Scheme};

use crate::transport::Transport;

/// Prefix applied to the output field when a failure is rendered.
pub const ERROR_PREFIX: &str = "Error: ";

/// Handle to one input surface's pipeline. Cheap to clone.
pub struct InputPipeline<T: Transport> {
    inner: Arc<PipelineInner<T>>,
    output_rx: watch::Receiver<String>,
}

impl<T: Transport> Clone for InputPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            output_rx: self.output_rx.clone(),
        }
    }
}

struct PipelineInner<T> {
    transport: T,
    scheme: Scheme,
    /// Query → first successful result. Write-once per key, unbounded,
    /// lives as long as the pipeline.
    cache: DashMap<String, String>,
    state: Mutex<LiveState>,
    output_tx: watch::Sender<String>,
}

#[derive(Default)]
struct LiveState {
    /// Debounce timer that has not fired yet.
    pending: Option<JoinHandle<()>>,
    /// Token owned by the latest issued network request.
    inflight: Option<CancellationToken>,
}

// ─── Public API ────────────────────────────────────────────────────────────

impl<T: Transport> InputPipeline<T> {
    pub fn new(transport: T, scheme: Scheme) -> Self {
        let (output_tx, output_rx) = watch::channel(String::new());
        Self {
            inner: Arc::new(PipelineInner {
                transport,
                scheme,
                cache: DashMap::new(),
                state: Mutex::new(LiveState::default()),
                output_tx,
            }),
            output_rx,
        }
    }

    /// Feed one raw input-change event. Commits the trimmed text after
    /// `delay` of quiescence; every call supersedes, never stacks, the
    /// previous pending timer. Empty input bypasses debounce and network
    /// entirely and clears the output field immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, raw: &str, delay: Duration) {
        let mut state = self.inner.state.lock().expect("pipeline state poisoned");
        if let Some(timer) = state.pending.take() {
            timer.abort();
        }

        match Query::parse(raw) {
            None => {
                // A stale response must not overwrite the cleared field.
                if let Some(token) = state.inflight.take() {
                    token.cancel();
                }
                self.inner.output_tx.send_replace(String::new());
            }
            Some(query) => {
                let inner = Arc::clone(&self.inner);
                state.pending = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let outcome = inner.resolve(&query).await;
                    inner.render(outcome);
                }));
            }
        }
    }

    /// Resolve a committed query, preferring cache over network.
    pub async fn resolve(&self, query: &Query) -> Resolution {
        self.inner.resolve(query).await
    }

    /// Apply a resolution to the output field.
    pub fn render(&self, outcome: Resolution) {
        self.inner.render(outcome);
    }

    /// Watch the output field.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.output_rx.clone()
    }

    /// Current contents of the output field.
    pub fn output(&self) -> String {
        self.output_rx.borrow().clone()
    }
}

// ─── Resolution ────────────────────────────────────────────────────────────

impl<T: Transport> PipelineInner<T> {
    async fn resolve(&self, query: &Query) -> Resolution {
        if let Some(hit) = self.cache.get(query.as_str()) {
            debug!("resolve: cache hit ({} chars)", query.as_str().len());
            return Resolution::Done(hit.value().clone());
        }

        debug!("resolve: fetching ({} chars)", query.as_str().len());
        let token = self.supersede();
        let outcome = self.transport.fetch(self.scheme, query.as_str(), &token).await;

        if let Resolution::Done(text) = &outcome {
            // First successful response wins for a given query.
            self.cache
                .entry(query.as_str().to_string())
                .or_insert_with(|| text.clone());
        }
        outcome
    }

    /// Issue a fresh token, cancelling the previous in-flight request
    /// unconditionally, even one that was resolving the same text.
    fn supersede(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut state = self.state.lock().expect("pipeline state poisoned");
        if let Some(prev) = state.inflight.replace(token.clone()) {
            prev.cancel();
        }
        token
    }

    fn render(&self, outcome: Resolution) {
        match outcome {
            Resolution::Done(text) => {
                self.output_tx.send_replace(text);
            }
            Resolution::Failed(message) => {
                self.output_tx.send_replace(format!("{ERROR_PREFIX}{message}"));
            }
            // A superseded request stays silent; a malformed payload was
            // already logged by the transport.
            Resolution::Cancelled | Resolution::NoResult => {}
        }
    }
}
