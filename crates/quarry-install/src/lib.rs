//! Quarry Install Library
//!
//! Bootstraps a content repository: relational schema, seed data, and
//! binary assets. The three steps are independent contracts; the shipped
//! [`CoreInstaller`] enforces that schema import succeeds before data import
//! and tracks completed steps so a partially failed install can be resumed.

pub mod core;

use async_trait::async_trait;
use quarry_core::AppError;

pub use crate::core::CoreInstaller;

/// Repository bootstrap contract.
///
/// Each step is idempotent by contract: running a completed step again must
/// be a no-op. `import_schema` must succeed before `import_data`;
/// `import_binaries` is independent of both.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install the repository schema.
    async fn import_schema(&self) -> Result<(), AppError>;

    /// Insert seed data. Fails with [`AppError::InvalidState`] while the
    /// schema has not been imported.
    async fn import_data(&self) -> Result<(), AppError>;

    /// Import seed binary files into the IO layer.
    async fn import_binaries(&self) -> Result<(), AppError>;
}
