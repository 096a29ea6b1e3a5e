//! Quarry IO Library
//!
//! Binary-file storage for the content repository, split into two
//! independently pluggable layers: a metadata handler (what is stored) and a
//! binary-data handler (where the bytes live). The [`IoService`] facade maps
//! repository-level identifiers to prefixed storage identifiers and keeps the
//! two layers consistent.
//!
//! # Identifier format
//!
//! Repository ids are relative paths (`images/logo.png`). The facade prepends
//! the active storage prefix before talking to either handler
//! (`var/site/storage/images/logo.png`) and strips it again on the way out.
//! Ids must not contain `..` or a leading `/`.

pub mod factory;
pub mod local;
pub mod memory;
pub mod mime;
pub mod scope;
pub mod service;
pub mod spi;

// Re-export commonly used types
pub use factory::{create_io_service, IoBackend, IoConfig};
pub use local::{LocalBinarydataHandler, LocalMetadataHandler};
pub use memory::{MemoryBinarydataHandler, MemoryMetadataHandler};
pub use mime::GuessMimeTypeDetector;
pub use scope::ScopeAwareIoService;
pub use service::IoService;
pub use spi::{
    BinarydataHandler, ByteStream, IoError, IoResult, MetadataHandler, MimeTypeDetector,
    SpiBinaryFile, SpiBinaryFileCreateStruct,
};
