//! Entities: named, typed field schemas.

use crate::column::ColumnType;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A named collection of typed fields. Field names are unique within an
/// entity and order is preserved (it matters for canonical serialization,
/// not for lookup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    fields: Vec<(ColumnType, String)>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a field. Returns `false` (no mutation) if a field with this
    /// name is already declared.
    pub fn add_field(&mut self, column_type: ColumnType, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.fields.iter().any(|(_, n)| n == &name) {
            return false;
        }
        self.fields.push((column_type, name));
        true
    }

    pub fn fields(&self) -> &[(ColumnType, String)] {
        &self.fields
    }

    pub fn field_type(&self, name: &str) -> Option<ColumnType> {
        self.fields
            .iter()
            .find(|(_, n)| n == name)
            .map(|(ty, _)| *ty)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(_, n)| n == name)
    }

    /// Validate that `value` is a legal instance of `field`'s declared
    /// column type. Unknown fields validate `false`.
    pub fn validate_field(&self, field: &str, value: &str) -> bool {
        match self.field_type(field) {
            Some(ty) => ty.validate(value),
            None => false,
        }
    }

    /// Canonical wire JSON.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "fields": self.fields.iter().map(|(ty, name)| json!({
                "name": name,
                "type": ty.name(),
            })).collect::<Vec<_>>(),
        })
    }

    pub fn from_json(value: &serde_json::Value) -> Option<Entity> {
        let name = value.get("name")?.as_str()?.to_string();
        let mut entity = Entity::new(name);
        for field in value.get("fields")?.as_array()? {
            let field_name = field.get("name")?.as_str()?;
            let ty = ColumnType::from_name(field.get("type")?.as_str()?)?;
            entity.add_field(ty, field_name);
        }
        Some(entity)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, (ty, name)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, ty)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_field_rejects_duplicates() {
        let mut entity = Entity::new("person");
        assert!(entity.add_field(ColumnType::String, "name"));
        assert!(!entity.add_field(ColumnType::Integer, "name"));
        assert_eq!(entity.fields().len(), 1);
    }

    #[test]
    fn validate_field_uses_declared_type() {
        let mut entity = Entity::new("person");
        entity.add_field(ColumnType::Integer, "age");
        assert!(entity.validate_field("age", "30"));
        assert!(!entity.validate_field("age", "thirty"));
        assert!(!entity.validate_field("missing", "anything"));
    }

    #[test]
    fn json_round_trips() {
        let mut entity = Entity::new("person");
        entity.add_field(ColumnType::String, "name");
        entity.add_field(ColumnType::Integer, "age");
        let json = entity.to_json();
        let back = Entity::from_json(&json).expect("round trip");
        assert_eq!(entity, back);
    }
}
