//! External field storage.

use async_trait::async_trait;
use quarry_core::models::FieldValue;
use quarry_core::AppError;

/// Storage for field data living outside main storage.
///
/// Called around persistence of the owning content object: `store_field_data`
/// after the main row is written, `get_field_data` after it is read.
#[async_trait]
pub trait FieldStorage: Send + Sync {
    /// Persist external data for a field. Returns `true` when main storage
    /// must be updated afterwards (the storage rewrote `value.data`).
    async fn store_field_data(&self, field_id: i64, value: &mut FieldValue)
        -> Result<bool, AppError>;

    /// Restore external data into `value`.
    async fn get_field_data(&self, field_id: i64, value: &mut FieldValue) -> Result<(), AppError>;

    async fn delete_field_data(&self, field_id: i64) -> Result<(), AppError>;

    /// Whether this storage keeps any external data at all.
    fn has_external_data(&self) -> bool {
        true
    }
}

/// No-op storage for internal field types.
pub struct NullStorage;

#[async_trait]
impl FieldStorage for NullStorage {
    async fn store_field_data(
        &self,
        _field_id: i64,
        _value: &mut FieldValue,
    ) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn get_field_data(
        &self,
        _field_id: i64,
        _value: &mut FieldValue,
    ) -> Result<(), AppError> {
        Ok(())
    }

    async fn delete_field_data(&self, _field_id: i64) -> Result<(), AppError> {
        Ok(())
    }

    fn has_external_data(&self) -> bool {
        false
    }
}
