//! Attribute tuples and buckets.

use crate::column::ColumnType;
use crate::keys::bucket_hash;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single typed `(entity, attribute, value)` observation used to filter
/// relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeTuple {
    pub entity: String,
    pub attribute: String,
    pub value: String,
    pub r#type: ColumnType,
}

impl AttributeTuple {
    pub fn new(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
        r#type: ColumnType,
    ) -> Self {
        Self {
            entity: entity.into(),
            attribute: attribute.into(),
            value: value.into(),
            r#type,
        }
    }

    /// `md5(entity + attribute)` — identifies which bucket slot this tuple
    /// belongs in. The value is deliberately excluded: two tuples about the
    /// same entity/attribute pair collide into the same bucket regardless of
    /// what value each carries.
    pub fn bucket_hash(&self) -> String {
        bucket_hash(&self.entity, &self.attribute)
    }
}

impl std::fmt::Display for AttributeTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} {} ({})",
            self.entity, self.attribute, self.value, self.r#type
        )
    }
}

/// A collection of [`AttributeTuple`]s keyed by bucket hash, one key may
/// hold several tuples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeBucket {
    slots: HashMap<String, Vec<AttributeTuple>>,
}

impl AttributeBucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tuple: AttributeTuple) {
        self.slots.entry(tuple.bucket_hash()).or_default().push(tuple);
    }

    /// Remove every tuple in the bucket slot for `(entity, attribute)`.
    /// Returns the removed tuples.
    pub fn remove(&mut self, entity: &str, attribute: &str) -> Vec<AttributeTuple> {
        self.slots
            .remove(&bucket_hash(entity, attribute))
            .unwrap_or_default()
    }

    pub fn has(&self, entity: &str, attribute: &str) -> bool {
        self.slots.contains_key(&bucket_hash(entity, attribute))
    }

    pub fn get(&self, entity: &str, attribute: &str) -> &[AttributeTuple] {
        self.slots
            .get(&bucket_hash(entity, attribute))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate every tuple across every bucket slot, in no particular order.
    pub fn each(&self) -> impl Iterator<Item = &AttributeTuple> {
        self.slots.values().flatten()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }
}
