//! Email-address field type.

use std::sync::OnceLock;

use quarry_core::models::{FieldTypeConstraints, FieldValue, SortKey, StorageFieldValue};
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::traits::{Converter, FieldType, ValidationError};

pub const TYPE_NAME: &str = "email";
pub const VALIDATOR_NAME: &str = "EmailAddressValidator";

fn email_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // local@domain.tld, no whitespace, single @
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles")
    })
}

pub struct EmailAddressType;

impl FieldType for EmailAddressType {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn empty_value(&self) -> FieldValue {
        FieldValue::new(JsonValue::String(String::new()))
    }

    fn is_empty_value(&self, value: &FieldValue) -> bool {
        match &value.data {
            JsonValue::Null => true,
            JsonValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    fn validate(
        &self,
        _constraints: &FieldTypeConstraints,
        value: &FieldValue,
    ) -> Vec<ValidationError> {
        if self.is_empty_value(value) {
            return Vec::new();
        }

        let address = match value.data.as_str() {
            Some(address) => address,
            None => {
                return vec![ValidationError::new(format!(
                    "Value '{}' is not a string",
                    value.data
                ))]
            }
        };

        if email_regex().is_match(address) {
            Vec::new()
        } else {
            vec![ValidationError::new(format!(
                "The value must be a valid email address: '{}'",
                address
            ))]
        }
    }

    fn sort_key(&self, value: &FieldValue) -> SortKey {
        match value.data.as_str() {
            Some(address) => SortKey::String(address.to_lowercase()),
            None => SortKey::None,
        }
    }
}

pub struct EmailAddressConverter;

impl Converter for EmailAddressConverter {
    fn to_storage_value(&self, value: &FieldValue, storage: &mut StorageFieldValue) {
        storage.data_text = value.data.as_str().map(str::to_string);
        storage.sort_key_string = value
            .data
            .as_str()
            .map(str::to_lowercase)
            .unwrap_or_default();
    }

    fn from_storage_value(&self, storage: &StorageFieldValue) -> FieldValue {
        match &storage.data_text {
            Some(address) => FieldValue::new(JsonValue::String(address.clone()))
                .with_sort_key(SortKey::String(address.to_lowercase())),
            None => FieldValue::new(JsonValue::String(String::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_addresses_pass() {
        let field_type = EmailAddressType;
        let constraints = FieldTypeConstraints::default();

        for address in ["user@example.com", "info@quarry.dev", "a.b+c@sub.domain.org"] {
            assert!(
                field_type
                    .validate(&constraints, &FieldValue::new(json!(address)))
                    .is_empty(),
                "expected '{}' to validate",
                address
            );
        }
    }

    #[test]
    fn test_malformed_addresses_fail() {
        let field_type = EmailAddressType;
        let constraints = FieldTypeConstraints::default();

        for address in ["not-an-email", "two@@example.com", "white space@x.org", "no@tld"] {
            assert_eq!(
                field_type
                    .validate(&constraints, &FieldValue::new(json!(address)))
                    .len(),
                1,
                "expected '{}' to fail",
                address
            );
        }
    }

    #[test]
    fn test_empty_value_is_not_validated() {
        let field_type = EmailAddressType;
        assert!(field_type
            .validate(&FieldTypeConstraints::default(), &field_type.empty_value())
            .is_empty());
    }

    #[test]
    fn test_converter_round_trip_lowercases_sort_key() {
        let converter = EmailAddressConverter;
        let value = FieldValue::new(json!("User@Example.COM"))
            .with_sort_key(SortKey::String("user@example.com".to_string()));

        let mut storage = StorageFieldValue::default();
        converter.to_storage_value(&value, &mut storage);
        assert_eq!(storage.data_text.as_deref(), Some("User@Example.COM"));
        assert_eq!(storage.sort_key_string, "user@example.com");

        let restored = converter.from_storage_value(&storage);
        assert_eq!(restored, value);
    }
}
