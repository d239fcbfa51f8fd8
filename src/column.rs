//! Column Type Registry.
//!
//! Four value types participate in entity schemas and relation attribute
//! values, represented as a tagged enum rather than a class hierarchy with
//! type-erased storage (see DESIGN.md).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("static pattern is valid"));
static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("static pattern is valid"));

/// One of the four value types a field or attribute value can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Null,
}

impl ColumnType {
    /// The wire name used in entity/relation JSON.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Null => "null",
        }
    }

    /// Parse a wire type name back into a `ColumnType`. Unknown names map to
    /// `None` rather than `Null` — `null` is a real declared type, not a
    /// catch-all for malformed input.
    pub fn from_name(name: &str) -> Option<ColumnType> {
        match name {
            "integer" => Some(ColumnType::Integer),
            "float" => Some(ColumnType::Float),
            "string" => Some(ColumnType::String),
            "null" => Some(ColumnType::Null),
            _ => None,
        }
    }

    /// Validate that `value` is a legal instance of this column type.
    ///
    /// `String` accepts anything; `Null` never validates a concrete value
    /// (it marks the absence of a declared type, not a type with a domain).
    pub fn validate(&self, value: &str) -> bool {
        match self {
            ColumnType::Integer => INTEGER_PATTERN.is_match(value),
            ColumnType::Float => FLOAT_PATTERN.is_match(value),
            ColumnType::String => true,
            ColumnType::Null => false,
        }
    }

    /// Two typed values are comparable iff their types are equal, or one is
    /// `Integer` and the other `Float`.
    pub fn comparable_with(&self, other: &ColumnType) -> bool {
        self == other
            || matches!(
                (self, other),
                (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer)
            )
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_validates_any_integer_string() {
        for n in [0, 1, -1, 42, -9999] {
            assert!(ColumnType::Integer.validate(&n.to_string()));
        }
    }

    #[test]
    fn float_validates_basic_floats() {
        assert!(ColumnType::Float.validate("5.2"));
        assert!(ColumnType::Float.validate("-5.2"));
        assert!(ColumnType::Float.validate("5"));
    }

    #[test]
    fn no_column_validates_arbitrary_junk() {
        assert!(!ColumnType::Integer.validate("abc"));
        assert!(!ColumnType::Integer.validate("1.5"));
        assert!(!ColumnType::Float.validate("abc"));
        assert!(!ColumnType::Null.validate("anything"));
    }

    #[test]
    fn string_accepts_everything() {
        assert!(ColumnType::String.validate(""));
        assert!(ColumnType::String.validate("1.5"));
        assert!(ColumnType::String.validate("hello"));
    }

    #[test]
    fn comparability_rule() {
        assert!(ColumnType::Integer.comparable_with(&ColumnType::Float));
        assert!(ColumnType::Float.comparable_with(&ColumnType::Integer));
        assert!(ColumnType::String.comparable_with(&ColumnType::String));
        assert!(!ColumnType::String.comparable_with(&ColumnType::Integer));
        assert!(!ColumnType::Null.comparable_with(&ColumnType::String));
    }

    #[test]
    fn name_round_trips() {
        for ty in [
            ColumnType::Integer,
            ColumnType::Float,
            ColumnType::String,
            ColumnType::Null,
        ] {
            assert_eq!(ColumnType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(ColumnType::from_name("bogus"), None);
    }
}
