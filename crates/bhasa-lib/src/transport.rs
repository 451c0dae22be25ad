//! Transport seam between the input pipeline and the gateway.
//!
//! The pipeline only ever talks to a [`Transport`], so tests can swap in
//! a scripted fake and assert on call counts without any network.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use bhasa_core::types::{Resolution, Scheme};

/// A way to resolve query text to a [`Resolution`].
///
/// Implementations must observe `cancel` and resolve to
/// [`Resolution::Cancelled`] when it fires, rather than erroring, so
/// callers can tell a superseded request from a genuine failure.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn fetch(&self, scheme: Scheme, text: &str, cancel: &CancellationToken) -> Resolution;
}
