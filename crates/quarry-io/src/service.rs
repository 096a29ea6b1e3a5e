//! Binary-file IO facade
//!
//! [`IoService`] exposes repository-level binary-file operations on top of a
//! metadata handler and a binary-data handler. It owns the storage prefix:
//! external ids are prefixed before reaching a handler and stripped again on
//! every value leaving the service. Not-found errors from either layer pass
//! through unchanged.

use std::path::Path;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use quarry_core::models::{BinaryFile, BinaryFileCreateStruct};

use crate::spi::{
    validate_key, BinarydataHandler, ByteStream, IoError, IoResult, MetadataHandler,
    MimeTypeDetector, SpiBinaryFile, SpiBinaryFileCreateStruct,
};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub struct IoService {
    metadata_handler: Arc<dyn MetadataHandler>,
    binarydata_handler: Arc<dyn BinarydataHandler>,
    mime_detector: Arc<dyn MimeTypeDetector>,
    prefix: RwLock<String>,
}

impl IoService {
    pub fn new(
        metadata_handler: Arc<dyn MetadataHandler>,
        binarydata_handler: Arc<dyn BinarydataHandler>,
        mime_detector: Arc<dyn MimeTypeDetector>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            metadata_handler,
            binarydata_handler,
            mime_detector,
            prefix: RwLock::new(prefix.into()),
        }
    }

    /// Replace the storage prefix for all subsequent operations.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        let mut guard = self.prefix.write().unwrap_or_else(|e| e.into_inner());
        *guard = prefix.into();
    }

    pub fn prefix(&self) -> String {
        self.prefix.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Map an external id to the prefixed id the handlers operate on.
    fn prefixed(&self, id: &str) -> IoResult<String> {
        validate_key(id)?;
        let prefix = self.prefix();
        if prefix.is_empty() {
            Ok(id.to_string())
        } else {
            Ok(format!("{}/{}", prefix.trim_end_matches('/'), id))
        }
    }

    /// Strip the prefix from a handler-level id.
    fn unprefixed(&self, spi_id: &str) -> IoResult<String> {
        let prefix = self.prefix();
        if prefix.is_empty() {
            return Ok(spi_id.to_string());
        }
        spi_id
            .strip_prefix(&format!("{}/", prefix.trim_end_matches('/')))
            .map(str::to_string)
            .ok_or_else(|| {
                IoError::InvalidKey(format!(
                    "Id '{}' is not part of prefix '{}'",
                    spi_id, prefix
                ))
            })
    }

    fn to_binary_file(&self, spi: SpiBinaryFile) -> IoResult<BinaryFile> {
        let uri = match spi.uri {
            Some(uri) => uri,
            None => self.binarydata_handler.uri(&spi.id),
        };
        Ok(BinaryFile {
            id: self.unprefixed(&spi.id)?,
            uri,
            size: spi.size,
            mime_type: spi.mime_type,
            modified: spi.modified,
        })
    }

    /// Build a create struct from a file on the local filesystem.
    ///
    /// The returned struct has no id; the caller assigns one before
    /// [`create_binary_file`](Self::create_binary_file).
    pub async fn new_binary_create_struct_from_local_file(
        &self,
        path: impl AsRef<Path>,
    ) -> IoResult<BinaryFileCreateStruct> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await.map_err(|e| {
            IoError::Backend(format!("Failed to read local file {}: {}", path.display(), e))
        })?;
        let mime_type = self
            .mime_detector
            .from_path(path)
            .or_else(|| self.mime_detector.from_buffer(&data))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        Ok(BinaryFileCreateStruct::from_bytes(Bytes::from(data), mime_type))
    }

    /// Build a create struct from an uploaded payload. The client-provided
    /// MIME type wins when present; otherwise the content is probed.
    pub async fn new_binary_create_struct_from_upload(
        &self,
        filename: &str,
        data: Bytes,
        client_mime_type: Option<&str>,
    ) -> IoResult<BinaryFileCreateStruct> {
        let mime_type = client_mime_type
            .map(str::to_string)
            .or_else(|| self.mime_detector.from_path(Path::new(filename)))
            .or_else(|| self.mime_detector.from_buffer(&data))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        Ok(BinaryFileCreateStruct::from_bytes(data, mime_type))
    }

    pub async fn exists(&self, id: &str) -> IoResult<bool> {
        let spi_id = self.prefixed(id)?;
        self.metadata_handler.exists(&spi_id).await
    }

    pub async fn load_binary_file(&self, id: &str) -> IoResult<BinaryFile> {
        let spi_id = self.prefixed(id)?;
        let spi = self.metadata_handler.load(&spi_id).await?;
        self.to_binary_file(spi)
    }

    /// Load by public URI: the binary-data layer recovers the stored id from
    /// the URI, then metadata is loaded as usual.
    pub async fn load_binary_file_by_uri(&self, uri: &str) -> IoResult<BinaryFile> {
        let spi_id = self.binarydata_handler.id_from_uri(uri)?;
        // ensure the URI belongs to this service's prefix before hitting metadata
        self.unprefixed(&spi_id)?;
        let spi = self.metadata_handler.load(&spi_id).await?;
        self.to_binary_file(spi)
    }

    pub async fn file_contents(&self, file: &BinaryFile) -> IoResult<Bytes> {
        let spi_id = self.prefixed(&file.id)?;
        self.binarydata_handler.contents(&spi_id).await
    }

    pub async fn file_input_stream(&self, file: &BinaryFile) -> IoResult<ByteStream> {
        let spi_id = self.prefixed(&file.id)?;
        self.binarydata_handler.stream(&spi_id).await
    }

    /// Persist a new binary file: data layer first, then metadata.
    pub async fn create_binary_file(
        &self,
        create: BinaryFileCreateStruct,
    ) -> IoResult<BinaryFile> {
        let id = create.id.clone().ok_or_else(|| {
            IoError::InvalidKey("Create struct has no id assigned".to_string())
        })?;
        let spi_id = self.prefixed(&id)?;

        let spi_create = SpiBinaryFileCreateStruct {
            id: spi_id,
            data: create.data,
            size: create.size,
            mime_type: create.mime_type,
        };

        self.binarydata_handler.create(&spi_create).await?;
        let spi = self.metadata_handler.create(&spi_create).await?;

        let file = self.to_binary_file(spi)?;
        tracing::info!(
            id = %file.id,
            size_bytes = file.size,
            mime_type = file.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE),
            "Binary file created"
        );
        Ok(file)
    }

    /// Public URI for an id, whether or not the file exists yet.
    pub fn uri(&self, id: &str) -> IoResult<String> {
        let spi_id = self.prefixed(id)?;
        Ok(self.binarydata_handler.uri(&spi_id))
    }

    pub async fn mime_type(&self, id: &str) -> IoResult<Option<String>> {
        let spi_id = self.prefixed(id)?;
        self.metadata_handler.mime_type(&spi_id).await
    }

    /// Delete a file from both layers. A not-found raised by either layer
    /// propagates to the caller.
    pub async fn delete_binary_file(&self, file: &BinaryFile) -> IoResult<()> {
        let spi_id = self.prefixed(&file.id)?;
        self.metadata_handler.delete(&spi_id).await?;
        self.binarydata_handler.delete(&spi_id).await?;
        tracing::info!(id = %file.id, "Binary file deleted");
        Ok(())
    }

    /// Delete a whole directory from both layers.
    pub async fn delete_directory(&self, path: &str) -> IoResult<()> {
        let spi_path = self.prefixed(path)?;
        self.binarydata_handler.delete_directory(&spi_path).await?;
        self.metadata_handler.delete_directory(&spi_path).await?;
        tracing::info!(path = %path, "Binary directory deleted");
        Ok(())
    }
}
