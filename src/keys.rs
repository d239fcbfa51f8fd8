//! Key-layout helpers for the store backend: a small struct of formatting
//! methods rather than scattered `format!` calls at every call site.

use md5::{Digest, Md5};
use regex::Regex;
use std::sync::LazyLock;

static ALPHANUMERIC_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]*$").expect("static pattern is valid"));

/// Key delimiter and reserved counter-key name, both overridable via
/// [`crate::config::StoreConfig`].
#[derive(Debug, Clone)]
pub struct KeyLayout {
    pub sep: String,
    pub counter_key: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            sep: "+".to_string(),
            counter_key: "total_relations".to_string(),
        }
    }
}

impl KeyLayout {
    pub fn new(sep: impl Into<String>, counter_key: impl Into<String>) -> Self {
        Self {
            sep: sep.into(),
            counter_key: counter_key.into(),
        }
    }

    pub fn entity_key(&self, name: &str) -> String {
        format!("ent{}{}", self.sep, name)
    }

    /// Key prefix shared by every stored instance of the `(left, right)`
    /// relation, regardless of its field hash.
    pub fn relation_prefix(&self, left: &str, right: &str) -> String {
        format!("rel{}{}", self.sep, order_pair(left, right, &self.sep))
    }

    /// Glob pattern matching every stored instance of the `(left, right)`
    /// relation (any field hash).
    pub fn relation_pattern(&self, left: &str, right: &str) -> String {
        format!("{}{}*", self.relation_prefix(left, right), self.sep)
    }

    pub fn relation_key(&self, left: &str, right: &str, hash: &str) -> String {
        format!("{}{}{}", self.relation_prefix(left, right), self.sep, hash)
    }

    pub fn bucket_key(&self, hash: &str) -> String {
        format!("attr{}{}", self.sep, hash)
    }

    pub fn counter_key(&self) -> &str {
        &self.counter_key
    }
}

/// Sort `a`/`b` lexicographically when both are plain alphanumeric, joining
/// them with `sep`. Either side containing anything else (including `sep`
/// itself) bypasses sorting and returns `a + sep + b` unchanged — an escape
/// hatch for values that would otherwise make the pairing ambiguous.
pub fn order_pair(a: &str, b: &str, sep: &str) -> String {
    if ALPHANUMERIC_ONLY.is_match(a) && ALPHANUMERIC_ONLY.is_match(b) {
        if a <= b {
            format!("{}{}{}", a, sep, b)
        } else {
            format!("{}{}{}", b, sep, a)
        }
    } else {
        format!("{}{}{}", a, sep, b)
    }
}

/// `md5(entity + attribute)`, hex-encoded — the bucket-identity hash.
pub fn bucket_hash(entity: &str, attribute: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(entity.as_bytes());
    hasher.update(attribute.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// `md5(canonical_fields)`, hex-encoded — the relation-identity hash.
/// `canonical_fields` is built by the caller (see
/// `Relation::canonical_fields`) since it depends on field ordering rules
/// that belong to the model layer, not the key layer.
pub fn relation_hash(canonical_fields: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(canonical_fields.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_pair_sorts_plain_alphanumeric() {
        assert_eq!(order_pair("zebra", "alpha", "+"), "alpha+zebra");
        assert_eq!(order_pair("alpha", "zebra", "+"), "alpha+zebra");
        assert_eq!(order_pair("same", "same", "+"), "same+same");
    }

    #[test]
    fn order_pair_bypasses_sort_on_non_alphanumeric() {
        assert_eq!(order_pair("z-ebra", "alpha", "+"), "z-ebra+alpha");
        assert_eq!(order_pair("b", "a+b", "+"), "b+a+b");
    }

    #[test]
    fn order_pair_is_symmetric_for_plain_names() {
        assert_eq!(
            order_pair("user1", "user2", "+"),
            order_pair("user2", "user1", "+")
        );
    }

    #[test]
    fn layout_builds_expected_keys() {
        let layout = KeyLayout::default();
        assert_eq!(layout.entity_key("person"), "ent+person");
        assert_eq!(
            layout.relation_key("alice", "bob", "abc123"),
            "rel+alice+bob+abc123"
        );
        assert_eq!(layout.bucket_key("abc123"), "attr+abc123");
        assert_eq!(layout.counter_key(), "total_relations");
    }

    #[test]
    fn bucket_hash_is_deterministic_and_value_independent() {
        let h1 = bucket_hash("alice", "age");
        let h2 = bucket_hash("alice", "age");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 32);
    }

    #[test]
    fn relation_hash_changes_with_input() {
        assert_ne!(relation_hash("a"), relation_hash("b"));
    }
}
