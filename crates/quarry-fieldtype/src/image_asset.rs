//! Image-asset field type.
//!
//! The field references a binary file stored through the IO service instead
//! of embedding image data. Main storage keeps nothing; the reference lives
//! in external data and round-trips through an [`AssetGateway`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use quarry_core::models::{FieldTypeConstraints, FieldValue, SortKey, StorageFieldValue};
use quarry_core::AppError;
use quarry_io::IoService;
use serde_json::{json, Value as JsonValue};

use crate::storage::FieldStorage;
use crate::traits::{Converter, FieldType, ValidationError};

pub const TYPE_NAME: &str = "image_asset";

/// External-data payload: the referenced file plus presentation extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub asset_id: String,
    pub alternative_text: Option<String>,
}

impl AssetReference {
    pub fn to_json(&self) -> JsonValue {
        json!({
            "asset_id": self.asset_id,
            "alternative_text": self.alternative_text,
        })
    }

    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let asset_id = value.get("asset_id")?.as_str()?.to_string();
        let alternative_text = value
            .get("alternative_text")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        Some(Self {
            asset_id,
            alternative_text,
        })
    }
}

pub struct ImageAssetType;

impl FieldType for ImageAssetType {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn empty_value(&self) -> FieldValue {
        FieldValue::new(JsonValue::Null)
    }

    fn is_empty_value(&self, value: &FieldValue) -> bool {
        value.external_data.is_none()
    }

    fn validate(
        &self,
        _constraints: &FieldTypeConstraints,
        value: &FieldValue,
    ) -> Vec<ValidationError> {
        match &value.external_data {
            None => Vec::new(),
            Some(external) => match AssetReference::from_json(external) {
                Some(_) => Vec::new(),
                None => vec![ValidationError::new(
                    "Image asset reference is missing an asset id".to_string(),
                )],
            },
        }
    }

    fn sort_key(&self, _value: &FieldValue) -> SortKey {
        // asset references are not sortable
        SortKey::None
    }
}

/// Main storage keeps nothing for asset references.
pub struct ImageAssetConverter;

impl Converter for ImageAssetConverter {
    fn to_storage_value(&self, _value: &FieldValue, storage: &mut StorageFieldValue) {
        storage.data_int = None;
        storage.data_text = None;
        storage.data_float = None;
    }

    fn from_storage_value(&self, _storage: &StorageFieldValue) -> FieldValue {
        FieldValue::new(JsonValue::Null)
    }
}

/// Persists field-id → asset-reference mappings.
#[async_trait]
pub trait AssetGateway: Send + Sync {
    async fn store(&self, field_id: i64, reference: &AssetReference) -> Result<(), AppError>;

    async fn load(&self, field_id: i64) -> Result<Option<AssetReference>, AppError>;

    async fn delete(&self, field_id: i64) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct MemoryAssetGateway {
    references: RwLock<HashMap<i64, AssetReference>>,
}

impl MemoryAssetGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetGateway for MemoryAssetGateway {
    async fn store(&self, field_id: i64, reference: &AssetReference) -> Result<(), AppError> {
        let mut references = self.references.write().unwrap_or_else(|e| e.into_inner());
        references.insert(field_id, reference.clone());
        Ok(())
    }

    async fn load(&self, field_id: i64) -> Result<Option<AssetReference>, AppError> {
        let references = self.references.read().unwrap_or_else(|e| e.into_inner());
        Ok(references.get(&field_id).cloned())
    }

    async fn delete(&self, field_id: i64) -> Result<(), AppError> {
        let mut references = self.references.write().unwrap_or_else(|e| e.into_inner());
        references.remove(&field_id);
        Ok(())
    }
}

/// External storage verifying the referenced binary file exists before
/// persisting the reference.
pub struct ImageAssetStorage {
    gateway: Arc<dyn AssetGateway>,
    io_service: Arc<IoService>,
}

impl ImageAssetStorage {
    pub fn new(gateway: Arc<dyn AssetGateway>, io_service: Arc<IoService>) -> Self {
        Self {
            gateway,
            io_service,
        }
    }
}

#[async_trait]
impl FieldStorage for ImageAssetStorage {
    async fn store_field_data(
        &self,
        field_id: i64,
        value: &mut FieldValue,
    ) -> Result<bool, AppError> {
        let external = match &value.external_data {
            Some(external) => external,
            None => {
                self.gateway.delete(field_id).await?;
                return Ok(false);
            }
        };

        let reference = AssetReference::from_json(external).ok_or_else(|| {
            AppError::InvalidInput("Image asset reference is missing an asset id".to_string())
        })?;

        if !self.io_service.exists(&reference.asset_id).await? {
            return Err(AppError::BinaryFileNotFound(reference.asset_id));
        }

        self.gateway.store(field_id, &reference).await?;
        tracing::debug!(field_id, asset_id = %reference.asset_id, "Image asset reference stored");
        Ok(false)
    }

    async fn get_field_data(&self, field_id: i64, value: &mut FieldValue) -> Result<(), AppError> {
        value.external_data = self
            .gateway
            .load(field_id)
            .await?
            .map(|reference| reference.to_json());
        Ok(())
    }

    async fn delete_field_data(&self, field_id: i64) -> Result<(), AppError> {
        self.gateway.delete(field_id).await
    }
}
