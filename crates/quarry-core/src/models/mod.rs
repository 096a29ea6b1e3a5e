//! Data models for the content repository
//!
//! This module contains the value objects used throughout the repository,
//! organized by domain area.

mod binary_file;
mod field;
mod location;
mod site_access;

pub use binary_file::{BinaryFile, BinaryFileCreateStruct};
pub use field::{FieldDefinition, FieldTypeConstraints, FieldValue, SortKey, StorageFieldValue};
pub use location::{Location, TrashItem};
pub use site_access::SiteAccess;
