//! The data model: entities, relations, and attribute tuples/buckets.

mod attribute;
mod entity;
mod relation;

pub use attribute::{AttributeBucket, AttributeTuple};
pub use entity::Entity;
pub use relation::Relation;
