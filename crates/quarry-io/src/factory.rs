//! IO service construction from configuration.

use std::sync::Arc;

use crate::local::{LocalBinarydataHandler, LocalMetadataHandler};
use crate::memory::{MemoryBinarydataHandler, MemoryMetadataHandler};
use crate::mime::GuessMimeTypeDetector;
use crate::service::IoService;
use crate::spi::{IoError, IoResult};

/// Storage backend selection for the IO service.
#[derive(Debug, Clone)]
pub enum IoBackend {
    Local {
        base_path: String,
        base_url: String,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct IoConfig {
    pub backend: IoBackend,
    /// Initial storage prefix, e.g. `var/site/storage`.
    pub prefix: String,
}

/// Create an IO service based on configuration
pub async fn create_io_service(config: &IoConfig) -> IoResult<Arc<IoService>> {
    match &config.backend {
        IoBackend::Local {
            base_path,
            base_url,
        } => {
            if base_path.is_empty() {
                return Err(IoError::Config(
                    "Local backend requires a base path".to_string(),
                ));
            }
            let binarydata =
                LocalBinarydataHandler::new(base_path.clone(), base_url.clone()).await?;
            let metadata = LocalMetadataHandler::new(base_path.clone());

            Ok(Arc::new(IoService::new(
                Arc::new(metadata),
                Arc::new(binarydata),
                Arc::new(GuessMimeTypeDetector),
                config.prefix.clone(),
            )))
        }

        IoBackend::Memory => Ok(Arc::new(IoService::new(
            Arc::new(MemoryMetadataHandler::new()),
            Arc::new(MemoryBinarydataHandler::new()),
            Arc::new(GuessMimeTypeDetector),
            config.prefix.clone(),
        ))),
    }
}
