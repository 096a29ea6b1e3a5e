//! Integer field type.

use quarry_core::models::{FieldTypeConstraints, FieldValue, SortKey, StorageFieldValue};
use serde_json::Value as JsonValue;

use crate::traits::{Converter, FieldType, ValidationError};

pub const TYPE_NAME: &str = "integer";
pub const VALIDATOR_NAME: &str = "IntegerValueValidator";

pub struct IntegerType;

/// Read a bound from validator options. Unconfigured bounds are stored as
/// `false` or `null`, both of which mean "no limit".
fn bound(options: &JsonValue, key: &str) -> Option<i64> {
    options.get(key).and_then(JsonValue::as_i64)
}

impl FieldType for IntegerType {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn empty_value(&self) -> FieldValue {
        FieldValue::new(JsonValue::Null)
    }

    fn is_empty_value(&self, value: &FieldValue) -> bool {
        value.data.is_null()
    }

    fn validate(
        &self,
        constraints: &FieldTypeConstraints,
        value: &FieldValue,
    ) -> Vec<ValidationError> {
        if self.is_empty_value(value) {
            return Vec::new();
        }

        let number = match value.data.as_i64() {
            Some(number) => number,
            None => {
                return vec![ValidationError::new(format!(
                    "Value '{}' is not an integer",
                    value.data
                ))]
            }
        };

        let mut errors = Vec::new();
        if let Some(options) = constraints.validator(VALIDATOR_NAME) {
            if let Some(min) = bound(options, "minIntegerValue") {
                if number < min {
                    errors.push(ValidationError::new(format!(
                        "The value can not be lower than {}",
                        min
                    )));
                }
            }
            if let Some(max) = bound(options, "maxIntegerValue") {
                if number > max {
                    errors.push(ValidationError::new(format!(
                        "The value can not be higher than {}",
                        max
                    )));
                }
            }
        }
        errors
    }

    fn sort_key(&self, value: &FieldValue) -> SortKey {
        match value.data.as_i64() {
            Some(number) => SortKey::Int(number),
            None => SortKey::None,
        }
    }
}

pub struct IntegerConverter;

impl Converter for IntegerConverter {
    fn to_storage_value(&self, value: &FieldValue, storage: &mut StorageFieldValue) {
        storage.data_int = value.data.as_i64();
        storage.sort_key_int = value.data.as_i64().unwrap_or(0);
    }

    fn from_storage_value(&self, storage: &StorageFieldValue) -> FieldValue {
        match storage.data_int {
            Some(number) => {
                FieldValue::new(JsonValue::from(number)).with_sort_key(SortKey::Int(number))
            }
            None => FieldValue::new(JsonValue::Null),
        }
    }
}
