//! The Index Engine: entity and relation persistence, relation-count
//! bookkeeping, and cascade deletes, layered on a [`Store`].

use crate::emit::Emitter;
use crate::keys::KeyLayout;
use crate::model::{Entity, Relation};
use crate::store::{Store, StoreError, StoreResult};
use std::sync::Arc;

/// Wraps an `Arc<S>` store with the key layout and diagnostics sink the
/// rest of the engine operates through. Generic over `S: Store` rather
/// than `Arc<dyn Store>` so callers who only ever use one backend pay no
/// dynamic-dispatch cost; swap to a trait object at the call site if
/// multiple backends must coexist.
#[derive(Debug)]
pub struct IndexEngine<S: Store> {
    store: Arc<S>,
    layout: KeyLayout,
    emitter: Arc<dyn Emitter>,
}

impl<S: Store> IndexEngine<S> {
    pub fn new(store: Arc<S>, layout: KeyLayout, emitter: Arc<dyn Emitter>) -> Self {
        Self {
            store,
            layout,
            emitter,
        }
    }

    fn deserialize_entity(raw: &str) -> StoreResult<Entity> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Entity::from_json(&value)
            .ok_or_else(|| StoreError::Serialization("corrupt entity record".to_string()))
    }

    fn deserialize_relation(raw: &str) -> StoreResult<Relation> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Relation::from_json(&value)
            .ok_or_else(|| StoreError::Serialization("corrupt relation record".to_string()))
    }

    /// Write (or overwrite) an entity's schema.
    pub async fn write_entity(&self, entity: &Entity) -> StoreResult<()> {
        let key = self.layout.entity_key(&entity.name);
        self.store.set(&key, &entity.to_json().to_string()).await
    }

    pub async fn get_entity(&self, name: &str) -> StoreResult<Option<Entity>> {
        match self.store.get(&self.layout.entity_key(name)).await? {
            Some(raw) => Ok(Some(Self::deserialize_entity(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn exists_entity_field(&self, name: &str, field: &str) -> StoreResult<bool> {
        Ok(self
            .get_entity(name)
            .await?
            .map(|entity| entity.has_field(field))
            .unwrap_or(false))
    }

    /// Remove an entity and cascade-remove every relation referencing it on
    /// either side, decrementing the global counter for each. Returns
    /// `false` if the entity didn't exist.
    pub async fn remove_entity(&self, name: &str) -> StoreResult<bool> {
        let key = self.layout.entity_key(name);
        if !self.store.exists(&key).await? {
            return Ok(false);
        }
        self.store.del(&key).await?;

        let mut removed = 0u64;
        for relation_key in self.store.keys("rel+*").await? {
            let Some(raw) = self.store.get(&relation_key).await? else {
                continue;
            };
            let Ok(relation) = Self::deserialize_relation(&raw) else {
                continue;
            };
            if relation.left == name || relation.right == name {
                self.store.del(&relation_key).await?;
                removed += relation.instance_count;
            }
        }
        if removed > 0 {
            self.decrement_counter_total(removed).await?;
        }
        Ok(true)
    }

    /// Write one instance of `relation`. A colliding write (same `(left,
    /// right)` pair and field hash) increments the existing record's
    /// `instance_count` by 1 rather than duplicating storage.
    ///
    /// Follows `exists -> get -> set -> incr(total)` in that order — under
    /// concurrent writers to the same key this sequence is not atomic (two
    /// racing writers can both observe `exists == false` and each write
    /// `instance_count = 1`, losing one count). Left unsolved rather than
    /// papered over with a lock a key-value backend can't express.
    pub async fn write_relation(&self, relation: &Relation) -> StoreResult<()> {
        if !relation.is_valid() {
            self.emitter
                .warning("refusing to write relation with invalid cause/instance_count", false)
                .await;
            return Ok(());
        }

        let hash = relation.hash();
        let key = self
            .layout
            .relation_key(&relation.left, &relation.right, &hash);

        let stored = if self.store.exists(&key).await? {
            let raw = self
                .store
                .get(&key)
                .await?
                .expect("exists just returned true");
            let mut existing = Self::deserialize_relation(&raw)?;
            existing.instance_count += 1;
            existing
        } else {
            let mut fresh = relation.clone();
            fresh.instance_count = 1;
            fresh
        };

        self.store.set(&key, &stored.to_json().to_string()).await?;
        self.store.incr(self.layout.counter_key(), 1).await?;
        Ok(())
    }

    pub async fn get_relation(&self, left: &str, right: &str, hash: &str) -> StoreResult<Option<Relation>> {
        let key = self.layout.relation_key(left, right, hash);
        match self.store.get(&key).await? {
            Some(raw) => Ok(Some(Self::deserialize_relation(&raw)?)),
            None => Ok(None),
        }
    }

    /// Remove one instance of the relation identified by `(left, right,
    /// hash)`. Decrements `instance_count`; deletes the record entirely
    /// once it reaches zero. Returns `false` if the relation didn't exist.
    pub async fn remove_relation(&self, left: &str, right: &str, hash: &str) -> StoreResult<bool> {
        let key = self.layout.relation_key(left, right, hash);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(false);
        };
        let mut relation = Self::deserialize_relation(&raw)?;

        if relation.instance_count <= 1 {
            self.store.del(&key).await?;
        } else {
            relation.instance_count -= 1;
            self.store.set(&key, &relation.to_json().to_string()).await?;
        }

        self.decrement_counter_total(1).await?;
        Ok(true)
    }

    /// Raw keys matching `pattern` — exposed for the Bayesian Engine, which
    /// needs to scan every stored relation rather than just one `(left,
    /// right)` pair's.
    pub(crate) async fn fetch_relation_prefix_keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        self.store.keys(pattern).await
    }

    /// Load and deserialize the relation stored at a raw key, or `None` if
    /// it's missing or corrupt.
    pub(crate) async fn load_relation_at_key(&self, key: &str) -> StoreResult<Option<Relation>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Self::deserialize_relation(&raw).ok()),
            None => Ok(None),
        }
    }

    /// Every stored instance of the `(left, right)` relation, across all
    /// field hashes.
    pub async fn fetch_relation_prefix(&self, left: &str, right: &str) -> StoreResult<Vec<Relation>> {
        let pattern = self.layout.relation_pattern(left, right);
        let mut out = Vec::new();
        for key in self.store.keys(&pattern).await? {
            if let Some(raw) = self.store.get(&key).await? {
                out.push(Self::deserialize_relation(&raw)?);
            }
        }
        Ok(out)
    }

    /// Sum of `instance_count` across every stored instance of the `(left,
    /// right)` relation.
    pub async fn compute_relations_count(&self, left: &str, right: &str) -> StoreResult<u64> {
        Ok(self
            .fetch_relation_prefix(left, right)
            .await?
            .iter()
            .map(|relation| relation.instance_count)
            .sum())
    }

    pub async fn get_relation_count_total(&self) -> StoreResult<u64> {
        Ok(self
            .store
            .get(self.layout.counter_key())
            .await?
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(0))
    }

    pub async fn set_relation_count_total(&self, total: u64) -> StoreResult<()> {
        self.store.set(self.layout.counter_key(), &total.to_string()).await
    }

    /// Subtract `amount` from the global counter, clamping at zero and
    /// emitting a warning instead of underflowing.
    async fn decrement_counter_total(&self, amount: u64) -> StoreResult<()> {
        let current = self.get_relation_count_total().await?;
        if amount > current {
            self.emitter
                .warning(
                    &format!(
                        "relation counter underflow: tried to subtract {amount} from {current}, clamping to 0"
                    ),
                    false,
                )
                .await;
            self.set_relation_count_total(0).await
        } else {
            self.store
                .decr(self.layout.counter_key(), amount as i64)
                .await?;
            Ok(())
        }
    }
}
