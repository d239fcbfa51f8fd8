//! The diagnostics channel the core engine modules use: a trait with
//! default no-op method bodies, implemented by whatever the caller wants
//! (nothing, `tracing`, a test spy).
//!
//! `index`, `filter` and `bayes` never call `tracing` directly; they only
//! ever call through an injected `Arc<dyn Emitter>`, so swapping the sink
//! needs no change to engine code.

use async_trait::async_trait;

/// Diagnostics sink injected into [`crate::index::IndexEngine`] and
/// [`crate::bayes::BayesianEngine`]. Each method defaults to a no-op so
/// implementers only override what they care about.
#[async_trait]
pub trait Emitter: Send + Sync + std::fmt::Debug {
    async fn error(&self, message: &str, is_debug: bool) {
        let _ = (message, is_debug);
    }

    async fn warning(&self, message: &str, is_debug: bool) {
        let _ = (message, is_debug);
    }

    async fn note(&self, message: &str, is_debug: bool) {
        let _ = (message, is_debug);
    }
}

/// An emitter that discards every message. The default for tests and for
/// callers that don't want diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEmitter;

impl Emitter for NoopEmitter {}

/// Bridges into the `tracing` macros the `logging` subsystem configures.
/// This is the ambient-stack bridge: the engine modules never call
/// `tracing` themselves, only this impl does, and only because a caller
/// chose to inject it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEmitter;

#[async_trait]
impl Emitter for TracingEmitter {
    async fn error(&self, message: &str, is_debug: bool) {
        if is_debug {
            tracing::debug!(target: "databayes::emit", kind = "error", %message);
        } else {
            tracing::error!(target: "databayes::emit", %message);
        }
    }

    async fn warning(&self, message: &str, is_debug: bool) {
        if is_debug {
            tracing::debug!(target: "databayes::emit", kind = "warning", %message);
        } else {
            tracing::warn!(target: "databayes::emit", %message);
        }
    }

    async fn note(&self, message: &str, is_debug: bool) {
        if is_debug {
            tracing::debug!(target: "databayes::emit", kind = "note", %message);
        } else {
            tracing::info!(target: "databayes::emit", %message);
        }
    }
}
