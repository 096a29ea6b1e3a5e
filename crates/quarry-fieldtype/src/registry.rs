//! Field type registry.

use std::collections::HashMap;
use std::sync::Arc;

use quarry_core::AppError;

use crate::storage::FieldStorage;
use crate::traits::{Converter, FieldType};

/// The three collaborators a field type registers together.
#[derive(Clone)]
pub struct FieldTypeEntry {
    pub field_type: Arc<dyn FieldType>,
    pub converter: Arc<dyn Converter>,
    pub storage: Arc<dyn FieldStorage>,
}

impl std::fmt::Debug for FieldTypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldTypeEntry")
            .field("field_type", &self.field_type.type_name())
            .finish()
    }
}

/// Lookup of field type collaborators by type name.
#[derive(Default)]
pub struct FieldTypeRegistry {
    entries: HashMap<String, FieldTypeEntry>,
}

impl FieldTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        field_type: Arc<dyn FieldType>,
        converter: Arc<dyn Converter>,
        storage: Arc<dyn FieldStorage>,
    ) {
        let name = field_type.type_name().to_string();
        tracing::debug!(field_type = %name, "Field type registered");
        self.entries.insert(
            name,
            FieldTypeEntry {
                field_type,
                converter,
                storage,
            },
        );
    }

    pub fn entry(&self, type_name: &str) -> Result<&FieldTypeEntry, AppError> {
        self.entries
            .get(type_name)
            .ok_or_else(|| AppError::NotFound(format!("Field type '{}' is not registered", type_name)))
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integer::{IntegerConverter, IntegerType};
    use crate::storage::NullStorage;

    #[test]
    fn test_lookup_registered_type() {
        let mut registry = FieldTypeRegistry::new();
        registry.register(
            Arc::new(IntegerType),
            Arc::new(IntegerConverter),
            Arc::new(NullStorage),
        );

        let entry = registry.entry("integer").unwrap();
        assert_eq!(entry.field_type.type_name(), "integer");
        assert!(!entry.storage.has_external_data());
    }

    #[test]
    fn test_unknown_type_is_not_found() {
        let registry = FieldTypeRegistry::new();
        let err = registry.entry("unknown").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
