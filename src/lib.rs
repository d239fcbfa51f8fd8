//! # databayes
//!
//! A relational-probabilistic store: typed entities and typed, directed,
//! attribute-bearing relations between them, persisted to a key-value
//! backend, queried through marginal/pairwise/conditional probabilities and
//! roulette-wheel sampling under attribute-filter constraints.
//!
//! ## Quick start
//!
//! ```no_run
//! use databayes::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let index = IndexEngine::new(store, KeyLayout::default(), Arc::new(NoopEmitter));
//!
//! let mut alice = Entity::new("alice");
//! alice.add_field(ColumnType::Integer, "age");
//! index.write_entity(&alice).await?;
//!
//! let mut likes = Relation::new("alice", "bob");
//! likes.add_left_attribute("weight", "3", ColumnType::Integer);
//! index.write_relation(&likes).await?;
//!
//! let bayes = BayesianEngine::new(&index);
//! let p = bayes.compute_pairwise("alice", "bob").await?;
//! # let _ = p;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`column`] — the four-way `ColumnType` registry.
//! - [`model`] — entities, relations, attribute tuples/buckets.
//! - [`keys`] — key-layout construction.
//! - [`store`] — the `Store` adapter, in-memory always, Redis behind a
//!   feature flag.
//! - [`index`] — the Index Engine: persistence, counting, cascade deletes.
//! - [`filter`] — the Filter Engine.
//! - [`bayes`] — the Bayesian Engine: probabilities and sampling.
//! - [`emit`] — the diagnostics sink the engine modules are generic over.
//! - [`config`] / [`logging`] — the ambient stack: layered configuration
//!   and structured logging.
//!
//! Out of scope (external collaborators, not part of this crate): a
//! query-language parser, an interactive client loop, a queue-poll daemon,
//! an HTTP socket layer.

pub mod bayes;
pub mod column;
pub mod config;
pub mod emit;
pub mod filter;
pub mod index;
pub mod keys;
pub mod logging;
pub mod model;
pub mod store;

/// Re-exports of the commonly used types, for `use databayes::prelude::*;`.
pub mod prelude {
    pub use crate::bayes::{BayesianEngine, SamplerRng, StdRngSampler};
    pub use crate::column::ColumnType;
    pub use crate::config::{ConfigBuilder, ConfigLoader, DatabayesConfig};
    pub use crate::emit::{Emitter, NoopEmitter, TracingEmitter};
    pub use crate::filter::{self, Comparator};
    pub use crate::index::IndexEngine;
    pub use crate::keys::KeyLayout;
    pub use crate::model::{AttributeBucket, AttributeTuple, Entity, Relation};
    pub use crate::store::{InMemoryStore, Store};
    #[cfg(feature = "redis-backend")]
    pub use crate::store::RedisStore;

    pub use crate::{DatabayesError, Result};
}

/// Current library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum DatabayesError {
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] crate::logging::LogError),
}

pub type Result<T> = std::result::Result<T, DatabayesError>;
