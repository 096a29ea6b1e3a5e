//! Quarry Field Type Library
//!
//! Pluggable value kinds for content fields. Each field type contributes
//! three collaborators, registered together:
//!
//! - a [`FieldType`] describing and validating values,
//! - a [`Converter`] mapping values to and from the relational-row-shaped
//!   [`StorageFieldValue`](quarry_core::StorageFieldValue),
//! - a [`FieldStorage`] for data living outside main storage
//!   ([`NullStorage`] for internal types).

pub mod email;
pub mod image_asset;
pub mod integer;
pub mod registry;
pub mod storage;
pub mod traits;

pub use email::{EmailAddressConverter, EmailAddressType};
pub use image_asset::{
    AssetGateway, AssetReference, ImageAssetConverter, ImageAssetStorage, ImageAssetType,
    MemoryAssetGateway,
};
pub use integer::{IntegerConverter, IntegerType};
pub use registry::{FieldTypeEntry, FieldTypeRegistry};
pub use storage::{FieldStorage, NullStorage};
pub use traits::{Converter, FieldType, ValidationError};
