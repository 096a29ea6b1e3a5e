//! Field type and converter contracts.

use quarry_core::models::{FieldTypeConstraints, FieldValue, SortKey, StorageFieldValue};

/// A single validation failure, addressed to the failing constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A pluggable value kind attachable to content.
pub trait FieldType: Send + Sync {
    /// Stable identifier used in field definitions, e.g. `"integer"`.
    fn type_name(&self) -> &'static str;

    fn empty_value(&self) -> FieldValue;

    fn is_empty_value(&self, value: &FieldValue) -> bool;

    /// Check a value against the configured constraints. An empty result
    /// means the value is acceptable.
    fn validate(
        &self,
        constraints: &FieldTypeConstraints,
        value: &FieldValue,
    ) -> Vec<ValidationError>;

    /// Sort key used for ordering and search.
    fn sort_key(&self, value: &FieldValue) -> SortKey;
}

/// Maps a field value to and from its persistence-layer representation.
///
/// Converters are pure: no IO, no external data. External data is restored
/// by the type's [`FieldStorage`](crate::FieldStorage).
pub trait Converter: Send + Sync {
    fn to_storage_value(&self, value: &FieldValue, storage: &mut StorageFieldValue);

    fn from_storage_value(&self, storage: &StorageFieldValue) -> FieldValue;
}
