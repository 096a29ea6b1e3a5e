//! Quarry Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! resolution shared across all Quarry components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{
    ConfigResolver, ScopeChangeDispatcher, ScopeChangeEvent, ScopeChangeSubscriber,
    ScopedConfigResolver,
};
pub use error::AppError;
pub use models::{
    BinaryFile, BinaryFileCreateStruct, FieldDefinition, FieldTypeConstraints, FieldValue,
    Location, SiteAccess, SortKey, StorageFieldValue, TrashItem,
};
