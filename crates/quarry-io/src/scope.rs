//! Configuration-scope-aware IO decorator
//!
//! Wraps an [`IoService`] and keeps its storage prefix synchronized with the
//! active configuration scope: a scope-change notification re-reads the
//! prefix parameter and pushes it into the inner service. Every IO operation
//! delegates unchanged.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use quarry_core::config::{ConfigResolver, ScopeChangeEvent, ScopeChangeSubscriber};
use quarry_core::models::{BinaryFile, BinaryFileCreateStruct};
use quarry_core::AppError;

use crate::service::IoService;
use crate::spi::{ByteStream, IoResult};

pub struct ScopeAwareIoService {
    config_resolver: Arc<dyn ConfigResolver>,
    inner: Arc<IoService>,
    prefix_parameter: String,
}

impl ScopeAwareIoService {
    /// Wrap `inner`, reading the initial prefix from configuration.
    pub fn new(
        config_resolver: Arc<dyn ConfigResolver>,
        inner: Arc<IoService>,
        prefix_parameter: impl Into<String>,
    ) -> Result<Self, AppError> {
        let prefix_parameter = prefix_parameter.into();
        let prefix = config_resolver.get_parameter(&prefix_parameter)?;
        inner.set_prefix(prefix);

        Ok(Self {
            config_resolver,
            inner,
            prefix_parameter,
        })
    }

    pub fn inner(&self) -> &Arc<IoService> {
        &self.inner
    }

    pub async fn new_binary_create_struct_from_local_file(
        &self,
        path: impl AsRef<Path>,
    ) -> IoResult<BinaryFileCreateStruct> {
        self.inner.new_binary_create_struct_from_local_file(path).await
    }

    pub async fn new_binary_create_struct_from_upload(
        &self,
        filename: &str,
        data: Bytes,
        client_mime_type: Option<&str>,
    ) -> IoResult<BinaryFileCreateStruct> {
        self.inner
            .new_binary_create_struct_from_upload(filename, data, client_mime_type)
            .await
    }

    pub async fn exists(&self, id: &str) -> IoResult<bool> {
        self.inner.exists(id).await
    }

    pub async fn load_binary_file(&self, id: &str) -> IoResult<BinaryFile> {
        self.inner.load_binary_file(id).await
    }

    pub async fn load_binary_file_by_uri(&self, uri: &str) -> IoResult<BinaryFile> {
        self.inner.load_binary_file_by_uri(uri).await
    }

    pub async fn file_contents(&self, file: &BinaryFile) -> IoResult<Bytes> {
        self.inner.file_contents(file).await
    }

    pub async fn file_input_stream(&self, file: &BinaryFile) -> IoResult<ByteStream> {
        self.inner.file_input_stream(file).await
    }

    pub async fn create_binary_file(
        &self,
        create: BinaryFileCreateStruct,
    ) -> IoResult<BinaryFile> {
        self.inner.create_binary_file(create).await
    }

    pub fn uri(&self, id: &str) -> IoResult<String> {
        self.inner.uri(id)
    }

    pub async fn mime_type(&self, id: &str) -> IoResult<Option<String>> {
        self.inner.mime_type(id).await
    }

    pub async fn delete_binary_file(&self, file: &BinaryFile) -> IoResult<()> {
        self.inner.delete_binary_file(file).await
    }

    pub async fn delete_directory(&self, path: &str) -> IoResult<()> {
        self.inner.delete_directory(path).await
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix);
    }
}

impl ScopeChangeSubscriber for ScopeAwareIoService {
    fn on_scope_change(&self, event: &ScopeChangeEvent) {
        match self.config_resolver.get_parameter(&self.prefix_parameter) {
            Ok(prefix) => {
                tracing::debug!(
                    scope = %event.site_access.name,
                    prefix = %prefix,
                    "Storage prefix resynchronized"
                );
                self.inner.set_prefix(prefix);
            }
            Err(err) => {
                // keep the previous prefix rather than break running requests
                tracing::error!(
                    scope = %event.site_access.name,
                    parameter = %self.prefix_parameter,
                    error = %err,
                    "Failed to resolve storage prefix on scope change"
                );
            }
        }
    }
}
