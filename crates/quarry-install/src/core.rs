//! SQL-file-driven installer.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quarry_core::AppError;
use quarry_io::IoService;
use sqlx::PgPool;
use tokio::fs;

use crate::Installer;

#[derive(Debug, Default, Clone, Copy)]
struct StepState {
    schema: bool,
    data: bool,
    binaries: bool,
}

/// Installs a repository from a schema file, a data file, and an optional
/// directory of seed binaries pushed through the IO service.
pub struct CoreInstaller {
    pool: PgPool,
    schema_file: PathBuf,
    data_file: PathBuf,
    binaries_dir: Option<PathBuf>,
    io_service: Arc<IoService>,
    state: Mutex<StepState>,
}

impl CoreInstaller {
    pub fn new(
        pool: PgPool,
        schema_file: impl Into<PathBuf>,
        data_file: impl Into<PathBuf>,
        binaries_dir: Option<PathBuf>,
        io_service: Arc<IoService>,
    ) -> Self {
        Self {
            pool,
            schema_file: schema_file.into(),
            data_file: data_file.into(),
            binaries_dir,
            io_service,
            state: Mutex::new(StepState::default()),
        }
    }

    fn state(&self) -> StepState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mark(&self, update: impl FnOnce(&mut StepState)) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        update(&mut state);
    }

    /// Read a SQL file and execute it statement by statement. The file is
    /// validated before anything executes, so a missing file never leaves a
    /// half-applied import behind.
    async fn run_sql_file(&self, path: &Path) -> Result<(), AppError> {
        let sql = fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("Cannot read SQL file {}: {}", path.display(), e))
        })?;

        let statements = split_statements(&sql);
        tracing::info!(
            file = %path.display(),
            statements = statements.len(),
            "Executing SQL import"
        );

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }

    async fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let mut stack = vec![dir.to_path_buf()];
        let mut files = Vec::new();

        while let Some(current) = stack.pop() {
            let mut entries = fs::read_dir(&current).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_dir() {
                    stack.push(entry.path());
                } else {
                    files.push(entry.path());
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Split a SQL dump into executable statements, dropping comment-only and
/// empty fragments.
fn split_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|fragment| {
            !fragment.is_empty()
                && fragment
                    .lines()
                    .any(|line| !line.trim().is_empty() && !line.trim().starts_with("--"))
        })
        .collect()
}

#[async_trait]
impl Installer for CoreInstaller {
    async fn import_schema(&self) -> Result<(), AppError> {
        if self.state().schema {
            tracing::debug!("Schema already imported, skipping");
            return Ok(());
        }

        self.run_sql_file(&self.schema_file).await?;
        self.mark(|state| state.schema = true);
        tracing::info!("Schema import completed");
        Ok(())
    }

    async fn import_data(&self) -> Result<(), AppError> {
        if !self.state().schema {
            return Err(AppError::InvalidState(
                "Schema must be imported before data".to_string(),
            ));
        }
        if self.state().data {
            tracing::debug!("Data already imported, skipping");
            return Ok(());
        }

        self.run_sql_file(&self.data_file).await?;
        self.mark(|state| state.data = true);
        tracing::info!("Data import completed");
        Ok(())
    }

    async fn import_binaries(&self) -> Result<(), AppError> {
        if self.state().binaries {
            tracing::debug!("Binaries already imported, skipping");
            return Ok(());
        }

        let dir = match &self.binaries_dir {
            Some(dir) => dir.clone(),
            None => {
                tracing::debug!("No binary seed directory configured");
                self.mark(|state| state.binaries = true);
                return Ok(());
            }
        };

        let files = Self::collect_files(&dir).await?;
        for path in &files {
            let id = path
                .strip_prefix(&dir)
                .map_err(|e| AppError::Internal(format!("Seed path escape: {}", e)))?
                .to_string_lossy()
                .replace('\\', "/");

            let mut create = self
                .io_service
                .new_binary_create_struct_from_local_file(path)
                .await?;
            create.id = Some(id);
            self.io_service.create_binary_file(create).await?;
        }

        self.mark(|state| state.binaries = true);
        tracing::info!(imported = files.len(), "Binary import completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_io::{create_io_service, IoBackend, IoConfig};

    fn lazy_pool() -> PgPool {
        // never actually connects; enough for tests that fail before any query
        PgPool::connect_lazy("postgres://localhost/quarry_test").unwrap()
    }

    async fn memory_io() -> Arc<IoService> {
        create_io_service(&IoConfig {
            backend: IoBackend::Memory,
            prefix: "var/install".to_string(),
        })
        .await
        .unwrap()
    }

    #[test]
    fn test_split_statements_drops_comments() {
        let sql = "-- preamble\nCREATE TABLE a (id INT);\n\n-- note\nINSERT INTO a VALUES (1);\n;\n-- trailing only\n";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("CREATE TABLE"));
        assert!(statements[1].contains("INSERT INTO"));
    }

    #[tokio::test]
    async fn test_data_before_schema_is_invalid_state() {
        let installer = CoreInstaller::new(
            lazy_pool(),
            "schema.sql",
            "data.sql",
            None,
            memory_io().await,
        );

        let err = installer.import_data().await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_STATE");
    }

    #[tokio::test]
    async fn test_missing_schema_file_fails_before_executing() {
        let installer = CoreInstaller::new(
            lazy_pool(),
            "/nonexistent/schema.sql",
            "data.sql",
            None,
            memory_io().await,
        );

        let err = installer.import_schema().await.unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_import_binaries_pushes_seed_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/logo.png"), b"\x89PNG\r\n\x1a\nx").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"seed").unwrap();

        let io_service = memory_io().await;
        let installer = CoreInstaller::new(
            lazy_pool(),
            "schema.sql",
            "data.sql",
            Some(dir.path().to_path_buf()),
            io_service.clone(),
        );

        installer.import_binaries().await.unwrap();

        assert!(io_service.exists("images/logo.png").await.unwrap());
        let file = io_service.load_binary_file("readme.txt").await.unwrap();
        assert_eq!(file.size, 4);

        // second run is a no-op, not a duplicate import
        installer.import_binaries().await.unwrap();
    }

    #[tokio::test]
    async fn test_import_binaries_without_seed_dir_is_noop() {
        let installer = CoreInstaller::new(
            lazy_pool(),
            "schema.sql",
            "data.sql",
            None,
            memory_io().await,
        );
        installer.import_binaries().await.unwrap();
    }
}
