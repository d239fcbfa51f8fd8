//! Relations: typed, directed, attribute-bearing edges between entities.

use crate::column::ColumnType;
use crate::keys::{order_pair, relation_hash};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// A typed, directed, attribute-bearing relation between two entities.
///
/// `cause` must equal `left` or `right` — it names which side is
/// responsible for the relation existing (the subject of "caused this
/// edge", not a data field). `instance_count` tracks how many times an
/// identical relation has been written: writing a colliding relation
/// increments it rather than duplicating storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub left: String,
    pub right: String,
    pub attrs_left: Vec<(String, String)>,
    pub attrs_right: Vec<(String, String)>,
    pub types_left: HashMap<String, ColumnType>,
    pub types_right: HashMap<String, ColumnType>,
    pub cause: String,
    pub instance_count: u64,
}

impl Relation {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        let left = left.into();
        let right = right.into();
        let cause = left.clone();
        Self {
            left,
            right,
            attrs_left: Vec::new(),
            attrs_right: Vec::new(),
            types_left: HashMap::new(),
            types_right: HashMap::new(),
            cause,
            instance_count: 1,
        }
    }

    pub fn add_left_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        ty: ColumnType,
    ) -> bool {
        let name = name.into();
        let value = value.into();
        if !ty.validate(&value) {
            return false;
        }
        self.types_left.insert(name.clone(), ty);
        self.attrs_left.retain(|(n, _)| n != &name);
        self.attrs_left.push((name, value));
        true
    }

    pub fn add_right_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        ty: ColumnType,
    ) -> bool {
        let name = name.into();
        let value = value.into();
        if !ty.validate(&value) {
            return false;
        }
        self.types_right.insert(name.clone(), ty);
        self.attrs_right.retain(|(n, _)| n != &name);
        self.attrs_right.push((name, value));
        true
    }

    /// `cause` must name one of the two sides; returns `false` (no
    /// mutation) otherwise.
    pub fn set_cause(&mut self, cause: impl Into<String>) -> bool {
        let cause = cause.into();
        if cause != self.left && cause != self.right {
            return false;
        }
        self.cause = cause;
        true
    }

    /// `instance_count` must be at least 1.
    pub fn set_instance_count(&mut self, count: u64) -> bool {
        if count < 1 {
            return false;
        }
        self.instance_count = count;
        true
    }

    pub fn is_valid(&self) -> bool {
        (self.cause == self.left || self.cause == self.right) && self.instance_count >= 1
    }

    /// Fetch a single attribute's value from whichever side declares it.
    pub fn value_of(&self, entity: &str, attribute: &str) -> Option<&str> {
        let attrs = if entity == self.left {
            &self.attrs_left
        } else if entity == self.right {
            &self.attrs_right
        } else {
            return None;
        };
        attrs
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value.as_str())
    }

    /// `left + right + cause` followed by, for each side, field name then
    /// value in lexicographic-by-field-name order. This feeds
    /// [`Self::hash`] and is chosen so two relations with the same fields
    /// hash identically regardless of the order they were added in.
    pub fn canonical_fields(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.left);
        out.push_str(&self.right);
        out.push_str(&self.cause);

        let mut left_sorted = self.attrs_left.clone();
        left_sorted.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in &left_sorted {
            out.push_str(name);
            out.push_str(value);
        }

        let mut right_sorted = self.attrs_right.clone();
        right_sorted.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, value) in &right_sorted {
            out.push_str(name);
            out.push_str(value);
        }

        out
    }

    pub fn hash(&self) -> String {
        relation_hash(&self.canonical_fields())
    }

    /// The storage key's `(left, right)` component, order-normalized.
    pub fn order_pair(&self, sep: &str) -> String {
        order_pair(&self.left, &self.right, sep)
    }

    /// Canonical wire JSON.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "left": self.left,
            "right": self.right,
            "attrs_left": self.attrs_left.iter().map(|(n, v)| json!({
                "name": n,
                "value": v,
                "type": self.types_left.get(n).map(ColumnType::name),
            })).collect::<Vec<_>>(),
            "attrs_right": self.attrs_right.iter().map(|(n, v)| json!({
                "name": n,
                "value": v,
                "type": self.types_right.get(n).map(ColumnType::name),
            })).collect::<Vec<_>>(),
            "cause": self.cause,
            "instance_count": self.instance_count,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> Option<Relation> {
        let left = value.get("left")?.as_str()?.to_string();
        let right = value.get("right")?.as_str()?.to_string();
        let mut relation = Relation::new(left, right);

        for attr in value.get("attrs_left")?.as_array()? {
            let name = attr.get("name")?.as_str()?;
            let attr_value = attr.get("value")?.as_str()?;
            let ty = ColumnType::from_name(attr.get("type")?.as_str()?)?;
            relation.add_left_attribute(name, attr_value, ty);
        }
        for attr in value.get("attrs_right")?.as_array()? {
            let name = attr.get("name")?.as_str()?;
            let attr_value = attr.get("value")?.as_str()?;
            let ty = ColumnType::from_name(attr.get("type")?.as_str()?)?;
            relation.add_right_attribute(name, attr_value, ty);
        }

        let cause = value.get("cause")?.as_str()?.to_string();
        relation.set_cause(cause);
        let instance_count = value.get("instance_count")?.as_u64()?;
        relation.set_instance_count(instance_count);

        Some(relation)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} (cause={}, count={})",
            self.left, self.right, self.cause, self.instance_count
        )
    }
}
