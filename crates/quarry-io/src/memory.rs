//! In-memory backend
//!
//! Handler pair backed by `RwLock<HashMap>` stores. Used by tests and as an
//! ephemeral backend for tooling that needs a repository without a disk.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use crate::spi::{
    validate_key, BinarydataHandler, ByteStream, IoError, IoResult, MetadataHandler,
    SpiBinaryFile, SpiBinaryFileCreateStruct,
};

#[derive(Default)]
pub struct MemoryMetadataHandler {
    files: RwLock<HashMap<String, SpiBinaryFile>>,
}

impl MemoryMetadataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataHandler for MemoryMetadataHandler {
    async fn create(&self, create: &SpiBinaryFileCreateStruct) -> IoResult<SpiBinaryFile> {
        validate_key(&create.id)?;
        let spi = SpiBinaryFile {
            id: create.id.clone(),
            size: create.size,
            uri: None,
            mime_type: Some(create.mime_type.clone()),
            modified: Some(Utc::now()),
        };
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(create.id.clone(), spi.clone());
        Ok(spi)
    }

    async fn load(&self, spi_id: &str) -> IoResult<SpiBinaryFile> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(spi_id)
            .cloned()
            .ok_or_else(|| IoError::NotFound(spi_id.to_string()))
    }

    async fn exists(&self, spi_id: &str) -> IoResult<bool> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        Ok(files.contains_key(spi_id))
    }

    async fn mime_type(&self, spi_id: &str) -> IoResult<Option<String>> {
        self.load(spi_id).await.map(|spi| spi.mime_type)
    }

    async fn delete(&self, spi_id: &str) -> IoResult<()> {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files
            .remove(spi_id)
            .map(|_| ())
            .ok_or_else(|| IoError::NotFound(spi_id.to_string()))
    }

    async fn delete_directory(&self, spi_path: &str) -> IoResult<()> {
        let dir = format!("{}/", spi_path.trim_end_matches('/'));
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.retain(|id, _| !id.starts_with(&dir));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBinarydataHandler {
    files: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBinarydataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BinarydataHandler for MemoryBinarydataHandler {
    async fn create(&self, create: &SpiBinaryFileCreateStruct) -> IoResult<()> {
        validate_key(&create.id)?;
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(create.id.clone(), create.data.clone());
        Ok(())
    }

    async fn contents(&self, spi_id: &str) -> IoResult<Bytes> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files
            .get(spi_id)
            .cloned()
            .ok_or_else(|| IoError::NotFound(spi_id.to_string()))
    }

    async fn stream(&self, spi_id: &str) -> IoResult<ByteStream> {
        let contents = self.contents(spi_id).await?;
        Ok(Box::pin(futures::stream::iter(vec![Ok(contents)])))
    }

    fn uri(&self, spi_id: &str) -> String {
        format!("/{}", spi_id)
    }

    fn id_from_uri(&self, uri: &str) -> IoResult<String> {
        uri.strip_prefix('/')
            .map(str::to_string)
            .ok_or_else(|| IoError::InvalidKey(format!("URI '{}' is not served from here", uri)))
    }

    async fn delete(&self, spi_id: &str) -> IoResult<()> {
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files
            .remove(spi_id)
            .map(|_| ())
            .ok_or_else(|| IoError::NotFound(spi_id.to_string()))
    }

    async fn delete_directory(&self, spi_path: &str) -> IoResult<()> {
        let dir = format!("{}/", spi_path.trim_end_matches('/'));
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.retain(|id, _| !id.starts_with(&dir));
        Ok(())
    }

    async fn exists(&self, spi_id: &str) -> IoResult<bool> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        Ok(files.contains_key(spi_id))
    }
}
