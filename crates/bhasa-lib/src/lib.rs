//! bhasa-lib — transliteration gateway and live input pipeline.
//!
//! The relay proxies unofficial Google endpoints (translation, input
//! tools, text-to-speech) behind a uniform JSON contract; the pipeline
//! turns raw keystrokes into debounced, cached, cancellation-safe
//! lookups against that gateway. Depends on bhasa-core for pure types
//! and payload parsing.

pub mod gateway;
pub mod pipeline;
pub mod playback;
pub mod relay;
pub mod server;
pub mod transport;

// Re-export bhasa-core for convenience
pub use bhasa_core;
