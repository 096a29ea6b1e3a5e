use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Sort key derived from a field value, used for ordering and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SortKey {
    Int(i64),
    String(String),
    None,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::None
    }
}

/// Structural value of a typed content field.
///
/// `data` is what the field type persists in main storage; `external_data`
/// is sourced from a separate storage layer and is absent for internal
/// types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub data: JsonValue,
    pub external_data: Option<JsonValue>,
    pub sort_key: SortKey,
}

impl FieldValue {
    pub fn new(data: JsonValue) -> Self {
        Self {
            data,
            external_data: None,
            sort_key: SortKey::None,
        }
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn with_external_data(mut self, external_data: JsonValue) -> Self {
        self.external_data = Some(external_data);
        self
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::new(JsonValue::Null)
    }
}

/// Relational-row-shaped representation of a field value, produced by a
/// converter. One column set fits every internal field type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageFieldValue {
    pub data_int: Option<i64>,
    pub data_text: Option<String>,
    pub data_float: Option<f64>,
    pub sort_key_int: i64,
    pub sort_key_string: String,
}

/// Validator configuration per field type, keyed by validator name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeConstraints {
    pub validators: BTreeMap<String, JsonValue>,
}

impl FieldTypeConstraints {
    pub fn with_validator(mut self, name: impl Into<String>, options: JsonValue) -> Self {
        self.validators.insert(name.into(), options);
        self
    }

    pub fn validator(&self, name: &str) -> Option<&JsonValue> {
        self.validators.get(name)
    }
}

/// Definition of a field on a content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: i64,
    pub name: String,
    pub field_type: String,
    pub constraints: FieldTypeConstraints,
    pub default_value: FieldValue,
}
