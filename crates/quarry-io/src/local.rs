//! Local filesystem backend
//!
//! A handler pair sharing one base directory: the binary-data handler owns
//! the bytes, the metadata handler derives metadata from filesystem stat.
//! Prefixed ids map directly to paths under the base directory, with
//! traversal-safe key validation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::spi::{
    validate_key, BinarydataHandler, ByteStream, IoError, IoResult, MetadataHandler,
    SpiBinaryFile, SpiBinaryFileCreateStruct,
};

fn key_to_path(base_path: &Path, spi_id: &str) -> IoResult<PathBuf> {
    validate_key(spi_id)?;
    Ok(base_path.join(spi_id))
}

async fn ensure_parent_dir(path: &Path) -> IoResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Binary-data handler storing file contents under a base directory.
#[derive(Clone)]
pub struct LocalBinarydataHandler {
    base_path: PathBuf,
    base_url: String,
}

impl LocalBinarydataHandler {
    /// Create the handler, ensuring the base directory exists.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/quarry/storage")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/storage")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> IoResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            IoError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBinarydataHandler {
            base_path,
            base_url,
        })
    }
}

#[async_trait]
impl BinarydataHandler for LocalBinarydataHandler {
    async fn create(&self, create: &SpiBinaryFileCreateStruct) -> IoResult<()> {
        let path = key_to_path(&self.base_path, &create.id)?;
        ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            IoError::Backend(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&create.data).await.map_err(|e| {
            IoError::Backend(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            IoError::Backend(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            id = %create.id,
            size_bytes = create.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local binary data written"
        );

        Ok(())
    }

    async fn contents(&self, spi_id: &str) -> IoResult<Bytes> {
        let path = key_to_path(&self.base_path, spi_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(IoError::NotFound(spi_id.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            IoError::Backend(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Ok(Bytes::from(data))
    }

    async fn stream(&self, spi_id: &str) -> IoResult<ByteStream> {
        let path = key_to_path(&self.base_path, spi_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(IoError::NotFound(spi_id.to_string()));
        }

        let file = fs::File::open(&path).await.map_err(|e| {
            IoError::Backend(format!("Failed to open file {}: {}", path.display(), e))
        })?;

        let reader = tokio_util::io::ReaderStream::new(file);
        let stream = reader.map(|result| {
            result.map_err(|e| IoError::Backend(format!("Failed to read chunk: {}", e)))
        });

        Ok(Box::pin(stream))
    }

    fn uri(&self, spi_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), spi_id)
    }

    fn id_from_uri(&self, uri: &str) -> IoResult<String> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        uri.strip_prefix(&base)
            .map(str::to_string)
            .ok_or_else(|| IoError::InvalidKey(format!("URI '{}' is not served from here", uri)))
    }

    async fn delete(&self, spi_id: &str) -> IoResult<()> {
        let path = key_to_path(&self.base_path, spi_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(IoError::NotFound(spi_id.to_string()));
        }

        fs::remove_file(&path).await.map_err(|e| {
            IoError::Backend(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), id = %spi_id, "Local binary data deleted");

        Ok(())
    }

    async fn delete_directory(&self, spi_path: &str) -> IoResult<()> {
        let path = key_to_path(&self.base_path, spi_path)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_dir_all(&path).await.map_err(|e| {
            IoError::Backend(format!(
                "Failed to delete directory {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path.display(), "Local binary directory deleted");

        Ok(())
    }

    async fn exists(&self, spi_id: &str) -> IoResult<bool> {
        let path = key_to_path(&self.base_path, spi_id)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

/// Metadata handler deriving everything from filesystem stat on the shared
/// base directory. Create and delete keep no records of their own; the data
/// layer owns the actual file.
#[derive(Clone)]
pub struct LocalMetadataHandler {
    base_path: PathBuf,
}

impl LocalMetadataHandler {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    async fn stat(&self, spi_id: &str) -> IoResult<(u64, Option<DateTime<Utc>>)> {
        let path = key_to_path(&self.base_path, spi_id)?;
        let meta = fs::metadata(&path)
            .await
            .map_err(|_| IoError::NotFound(spi_id.to_string()))?;
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        Ok((meta.len(), modified))
    }
}

#[async_trait]
impl MetadataHandler for LocalMetadataHandler {
    async fn create(&self, create: &SpiBinaryFileCreateStruct) -> IoResult<SpiBinaryFile> {
        // the data layer has already written the file; stat confirms it
        let (size, modified) = self.stat(&create.id).await?;
        Ok(SpiBinaryFile {
            id: create.id.clone(),
            size,
            uri: None,
            mime_type: Some(create.mime_type.clone()),
            modified,
        })
    }

    async fn load(&self, spi_id: &str) -> IoResult<SpiBinaryFile> {
        let (size, modified) = self.stat(spi_id).await?;
        Ok(SpiBinaryFile {
            id: spi_id.to_string(),
            size,
            uri: None,
            mime_type: mime_guess::from_path(spi_id).first_raw().map(str::to_string),
            modified,
        })
    }

    async fn exists(&self, spi_id: &str) -> IoResult<bool> {
        let path = key_to_path(&self.base_path, spi_id)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn mime_type(&self, spi_id: &str) -> IoResult<Option<String>> {
        if !self.exists(spi_id).await? {
            return Err(IoError::NotFound(spi_id.to_string()));
        }
        Ok(mime_guess::from_path(spi_id).first_raw().map(str::to_string))
    }

    async fn delete(&self, spi_id: &str) -> IoResult<()> {
        // stat-backed metadata has nothing of its own to remove, but an
        // absent file must still surface as not-found
        if !self.exists(spi_id).await? {
            return Err(IoError::NotFound(spi_id.to_string()));
        }
        Ok(())
    }

    async fn delete_directory(&self, _spi_path: &str) -> IoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::tempdir;

    const BASE_URL: &str = "http://localhost:3000/storage";

    async fn handlers(dir: &Path) -> (LocalMetadataHandler, LocalBinarydataHandler) {
        let binarydata = LocalBinarydataHandler::new(dir, BASE_URL.to_string())
            .await
            .unwrap();
        (LocalMetadataHandler::new(dir), binarydata)
    }

    fn create_struct(id: &str, data: &'static [u8]) -> SpiBinaryFileCreateStruct {
        SpiBinaryFileCreateStruct {
            id: id.to_string(),
            data: Bytes::from_static(data),
            size: data.len() as u64,
            mime_type: "text/plain".to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_then_read_back() {
        let dir = tempdir().unwrap();
        let (metadata, binarydata) = handlers(dir.path()).await;

        let create = create_struct("var/site/test.txt", b"test data");
        binarydata.create(&create).await.unwrap();
        let spi = metadata.create(&create).await.unwrap();

        assert_eq!(spi.size, 9);
        assert_eq!(
            binarydata.contents("var/site/test.txt").await.unwrap(),
            Bytes::from_static(b"test data")
        );
    }

    #[tokio::test]
    async fn test_stat_metadata_load() {
        let dir = tempdir().unwrap();
        let (metadata, binarydata) = handlers(dir.path()).await;

        binarydata
            .create(&create_struct("var/site/doc.txt", b"12345"))
            .await
            .unwrap();

        let spi = metadata.load("var/site/doc.txt").await.unwrap();
        assert_eq!(spi.size, 5);
        assert_eq!(spi.mime_type, Some("text/plain".to_string()));
        assert!(spi.modified.is_some());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let (_, binarydata) = handlers(dir.path()).await;

        let result = binarydata.contents("../../../etc/passwd").await;
        assert!(matches!(result, Err(IoError::InvalidKey(_))));

        let result = binarydata.delete("../etc/passwd").await;
        assert!(matches!(result, Err(IoError::InvalidKey(_))));

        let result = binarydata.exists("/etc/passwd").await;
        assert!(matches!(result, Err(IoError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let (metadata, binarydata) = handlers(dir.path()).await;

        let result = binarydata.delete("nonexistent/file.txt").await;
        assert!(matches!(result, Err(IoError::NotFound(_))));

        let result = metadata.delete("nonexistent/file.txt").await;
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_directory_is_idempotent() {
        let dir = tempdir().unwrap();
        let (_, binarydata) = handlers(dir.path()).await;

        binarydata
            .create(&create_struct("var/site/images/a.txt", b"a"))
            .await
            .unwrap();

        binarydata.delete_directory("var/site/images").await.unwrap();
        assert!(!binarydata.exists("var/site/images/a.txt").await.unwrap());

        // second delete of a now-absent directory is a no-op
        binarydata.delete_directory("var/site/images").await.unwrap();
    }

    #[tokio::test]
    async fn test_uri_round_trip() {
        let dir = tempdir().unwrap();
        let (_, binarydata) = handlers(dir.path()).await;

        let uri = binarydata.uri("var/site/test.txt");
        assert_eq!(uri, format!("{}/var/site/test.txt", BASE_URL));
        assert_eq!(binarydata.id_from_uri(&uri).unwrap(), "var/site/test.txt");

        let foreign = binarydata.id_from_uri("http://elsewhere/x.txt");
        assert!(matches!(foreign, Err(IoError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_stream_reads_full_contents() {
        let dir = tempdir().unwrap();
        let (_, binarydata) = handlers(dir.path()).await;

        binarydata
            .create(&create_struct("var/stream.txt", b"stream download test"))
            .await
            .unwrap();

        let mut stream = binarydata.stream("var/stream.txt").await.unwrap();
        let mut downloaded = Vec::new();
        while let Some(chunk) = stream.next().await {
            downloaded.extend_from_slice(&chunk.unwrap());
        }

        assert_eq!(downloaded, b"stream download test");
    }
}
