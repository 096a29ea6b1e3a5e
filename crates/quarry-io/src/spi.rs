//! Storage provider interface
//!
//! This module defines the handler traits every IO backend pair must
//! implement, plus the SPI value types they exchange. Handlers always see
//! *prefixed* identifiers; prefix mapping is the facade's job.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use quarry_core::AppError;
use thiserror::Error;

/// IO operation errors
#[derive(Debug, Error)]
pub enum IoError {
    #[error("Binary file not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for IO operations
pub type IoResult<T> = Result<T, IoError>;

impl From<IoError> for AppError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::NotFound(id) => AppError::BinaryFileNotFound(id),
            IoError::InvalidKey(msg) => AppError::InvalidInput(msg),
            IoError::Backend(msg) => AppError::Internal(msg),
            IoError::Io(err) => AppError::Io(err),
            IoError::Config(msg) => AppError::Config(msg),
        }
    }
}

/// Chunked binary content.
pub type ByteStream = Pin<Box<dyn Stream<Item = IoResult<Bytes>> + Send>>;

/// Stored file metadata as the handlers see it: the id carries the storage
/// prefix, and the URI may be absent when the metadata layer doesn't record
/// one (the facade fills it from the binary-data layer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiBinaryFile {
    pub id: String,
    pub size: u64,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
    pub modified: Option<DateTime<Utc>>,
}

/// Write intent at the handler layer; `id` is already prefixed.
#[derive(Debug, Clone)]
pub struct SpiBinaryFileCreateStruct {
    pub id: String,
    pub data: Bytes,
    pub size: u64,
    pub mime_type: String,
}

/// Metadata layer of a binary-file backend.
///
/// Stores what is known *about* a file. Implementations may derive metadata
/// from the data layer (filesystem stat) or keep their own records.
#[async_trait]
pub trait MetadataHandler: Send + Sync {
    /// Record metadata for a newly created file and return the stored form.
    async fn create(&self, create: &SpiBinaryFileCreateStruct) -> IoResult<SpiBinaryFile>;

    /// Load metadata. Absent files are a [`IoError::NotFound`] carrying the id.
    async fn load(&self, spi_id: &str) -> IoResult<SpiBinaryFile>;

    async fn exists(&self, spi_id: &str) -> IoResult<bool>;

    async fn mime_type(&self, spi_id: &str) -> IoResult<Option<String>>;

    /// Remove the metadata record. Absent files are a [`IoError::NotFound`].
    async fn delete(&self, spi_id: &str) -> IoResult<()>;

    /// Remove every record under the given path. Removing an absent
    /// directory is a no-op.
    async fn delete_directory(&self, spi_path: &str) -> IoResult<()>;
}

/// Data layer of a binary-file backend.
#[async_trait]
pub trait BinarydataHandler: Send + Sync {
    /// Persist the file contents.
    async fn create(&self, create: &SpiBinaryFileCreateStruct) -> IoResult<()>;

    /// Full contents of a stored file.
    async fn contents(&self, spi_id: &str) -> IoResult<Bytes>;

    /// Contents as a chunked stream, for large files.
    async fn stream(&self, spi_id: &str) -> IoResult<ByteStream>;

    /// Public URI for a stored id.
    fn uri(&self, spi_id: &str) -> String;

    /// Reverse of [`uri`](Self::uri): recover the stored id from a URI.
    fn id_from_uri(&self, uri: &str) -> IoResult<String>;

    /// Remove the file contents. Absent files are a [`IoError::NotFound`].
    async fn delete(&self, spi_id: &str) -> IoResult<()>;

    /// Remove every file under the given path. Removing an absent directory
    /// is a no-op.
    async fn delete_directory(&self, spi_path: &str) -> IoResult<()>;

    async fn exists(&self, spi_id: &str) -> IoResult<bool>;
}

/// Detects a MIME type for file content.
pub trait MimeTypeDetector: Send + Sync {
    /// Detect from a path, typically by extension.
    fn from_path(&self, path: &Path) -> Option<String>;

    /// Detect from leading content bytes.
    fn from_buffer(&self, buffer: &[u8]) -> Option<String>;
}

/// Validate a storage key: no traversal sequences, no absolute paths.
pub fn validate_key(key: &str) -> IoResult<()> {
    if key.is_empty() {
        return Err(IoError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.split('/').any(|segment| segment == "..") || key.starts_with('/') {
        return Err(IoError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/../b").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("images/logo.png").is_ok());
        // dots inside a segment are fine
        assert!(validate_key("images/..logo.png").is_ok());
    }

    #[test]
    fn test_io_error_maps_to_app_error() {
        let err: AppError = IoError::NotFound("images/logo.png".to_string()).into();
        assert_eq!(err.error_code(), "BINARY_FILE_NOT_FOUND");
        assert!(err.to_string().contains("images/logo.png"));
    }
}
