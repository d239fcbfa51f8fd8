//! Filter Engine.
//!
//! Evaluates an [`AttributeBucket`](crate::model::AttributeBucket) against a
//! set of relations under a comparator, returning the surviving subset.

use crate::column::ColumnType;
use crate::model::{AttributeBucket, Relation};

/// One of the six comparator tokens recognized by the filter engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    pub fn token(&self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }

    pub fn from_token(token: &str) -> Option<Comparator> {
        match token {
            "=" => Some(Comparator::Eq),
            "!=" => Some(Comparator::Ne),
            "<" => Some(Comparator::Lt),
            "<=" => Some(Comparator::Le),
            ">" => Some(Comparator::Gt),
            ">=" => Some(Comparator::Ge),
            _ => None,
        }
    }
}

/// Compare two typed values under `cmp`, applying the §4.2 coercion rule.
///
/// Mismatched types (anything that isn't equal-typed or integer/float)
/// disqualify rather than error — this mirrors `AttributeTuple::compare` in
/// the source, which defaulted to `false` rather than throwing.
fn values_match(
    lhs_type: ColumnType,
    lhs_value: &str,
    rhs_type: ColumnType,
    rhs_value: &str,
    cmp: Comparator,
) -> bool {
    if !lhs_type.comparable_with(&rhs_type) {
        return false;
    }
    if !lhs_type.validate(lhs_value) || !rhs_type.validate(rhs_value) {
        return false;
    }

    if lhs_type == ColumnType::String && rhs_type == ColumnType::String {
        return match cmp {
            Comparator::Eq => lhs_value == rhs_value,
            Comparator::Ne => lhs_value != rhs_value,
            Comparator::Lt => lhs_value < rhs_value,
            Comparator::Le => lhs_value <= rhs_value,
            Comparator::Gt => lhs_value > rhs_value,
            Comparator::Ge => lhs_value >= rhs_value,
        };
    }

    // Integer/Integer, Float/Float, or Integer/Float: coerce to f64.
    let (Ok(lhs_num), Ok(rhs_num)) = (lhs_value.parse::<f64>(), rhs_value.parse::<f64>()) else {
        return false;
    };
    match cmp {
        Comparator::Eq => lhs_num == rhs_num,
        Comparator::Ne => lhs_num != rhs_num,
        Comparator::Lt => lhs_num < rhs_num,
        Comparator::Le => lhs_num <= rhs_num,
        Comparator::Gt => lhs_num > rhs_num,
        Comparator::Ge => lhs_num >= rhs_num,
    }
}

/// Filter `relations` against `bucket` under `cmp`.
///
/// A relation survives iff, for every bucket tuple whose `(entity,
/// attribute)` matches one of the relation's sides, the relation's value at
/// that side/attribute stands in the `cmp` relation to the tuple's value.
/// Bucket tuples that don't apply to a relation don't disqualify it. An
/// empty bucket passes everything through (`O(|relations| · |bucket|)`).
pub fn filter(relations: &[Relation], bucket: &AttributeBucket, cmp: Comparator) -> Vec<Relation> {
    if bucket.is_empty() {
        return relations.to_vec();
    }

    relations
        .iter()
        .filter(|relation| relation_survives(relation, bucket, cmp))
        .cloned()
        .collect()
}

fn relation_survives(relation: &Relation, bucket: &AttributeBucket, cmp: Comparator) -> bool {
    for tuple in bucket.each() {
        let side = if tuple.entity == relation.left {
            Some((&relation.attrs_left, &relation.types_left))
        } else if tuple.entity == relation.right {
            Some((&relation.attrs_right, &relation.types_right))
        } else {
            None
        };

        let Some((attrs, types)) = side else {
            continue; // tuple's entity isn't a side of this relation; doesn't apply
        };

        let Some((_, relation_value)) = attrs.iter().find(|(name, _)| name == &tuple.attribute)
        else {
            continue; // tuple's attribute isn't set on this side; doesn't apply
        };

        let relation_type = types
            .get(&tuple.attribute)
            .copied()
            .unwrap_or(ColumnType::Null);

        if !values_match(relation_type, relation_value, tuple.r#type, &tuple.value, cmp) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeTuple, Relation};
    use std::collections::HashMap;

    fn relation_xy(a: &str, b: &str) -> Relation {
        let mut types_left = HashMap::new();
        types_left.insert("a".to_string(), ColumnType::Integer);
        let mut types_right = HashMap::new();
        types_right.insert("b".to_string(), ColumnType::String);
        Relation {
            left: "_x".to_string(),
            right: "_y".to_string(),
            attrs_left: vec![("a".to_string(), a.to_string())],
            attrs_right: vec![("b".to_string(), b.to_string())],
            types_left,
            types_right,
            cause: "_x".to_string(),
            instance_count: 1,
        }
    }

    #[test]
    fn empty_bucket_passes_everything() {
        let relations = vec![relation_xy("1", "hello"), relation_xy("2", "goodbye")];
        let bucket = AttributeBucket::new();
        let out = filter(&relations, &bucket, Comparator::Eq);
        assert_eq!(out.len(), relations.len());
    }

    #[test]
    fn matching_attribute_survives() {
        let relations = vec![relation_xy("1", "hello"), relation_xy("1", "goodbye")];
        let mut bucket = AttributeBucket::new();
        bucket.add(AttributeTuple::new("_x", "a", "1", ColumnType::Integer));
        let out = filter(&relations, &bucket, Comparator::Eq);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn non_matching_attribute_excludes_all() {
        let relations = vec![relation_xy("1", "hello"), relation_xy("1", "goodbye")];
        let mut bucket = AttributeBucket::new();
        bucket.add(AttributeTuple::new("_x", "a", "0", ColumnType::Integer));
        let out = filter(&relations, &bucket, Comparator::Eq);
        assert!(out.is_empty());
    }

    #[test]
    fn combined_bucket_narrows_to_one() {
        let relations = vec![relation_xy("1", "hello"), relation_xy("1", "goodbye")];
        let mut bucket = AttributeBucket::new();
        bucket.add(AttributeTuple::new("_y", "b", "hello", ColumnType::String));
        bucket.add(AttributeTuple::new("_x", "a", "1", ColumnType::Integer));
        let out = filter(&relations, &bucket, Comparator::Eq);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].attrs_right[0].1, "hello");
    }

    #[test]
    fn numeric_coercion_across_int_and_float() {
        let mut r1 = relation_xy("11", "x");
        r1.types_right.insert("b".to_string(), ColumnType::Float);
        r1.attrs_right = vec![("b".to_string(), "12.0".to_string())];

        let mut r2 = relation_xy("1", "x");
        r2.types_right.insert("b".to_string(), ColumnType::Float);
        r2.attrs_right = vec![("b".to_string(), "2.0".to_string())];

        let relations = vec![r1, r2];

        let mut bucket_a = AttributeBucket::new();
        bucket_a.add(AttributeTuple::new("_x", "a", "5", ColumnType::Integer));
        let out = filter(&relations, &bucket_a, Comparator::Gt);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].attrs_left[0].1, "11");

        let mut bucket_b = AttributeBucket::new();
        bucket_b.add(AttributeTuple::new("_y", "b", "5.0", ColumnType::Float));
        let out = filter(&relations, &bucket_b, Comparator::Gt);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].attrs_right[0].1, "12.0");
    }

    #[test]
    fn ge_matches_both() {
        let relations = vec![relation_xy("1", "x"), relation_xy("11", "x")];
        let mut bucket = AttributeBucket::new();
        bucket.add(AttributeTuple::new("_x", "a", "1", ColumnType::Integer));
        let out = filter(&relations, &bucket, Comparator::Ge);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn mismatched_types_disqualify() {
        let relations = vec![relation_xy("1", "hello")];
        let mut bucket = AttributeBucket::new();
        bucket.add(AttributeTuple::new("_x", "a", "hello", ColumnType::String));
        let out = filter(&relations, &bucket, Comparator::Eq);
        assert!(out.is_empty());
    }
}
