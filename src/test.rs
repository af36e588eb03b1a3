//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::commands;
use crate::model::{AppData, Month};
use crate::store::{Backend, Storage};
use crate::{Budget, Config};
use std::path::Path;
use tempfile::TempDir;

/// Test environment with an initialized budget home in a temporary directory.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a budget home using the JSON backend, as `budget init` would.
    pub async fn new() -> Self {
        Self::with_backend(Backend::Json).await
    }

    pub async fn with_backend(backend: Backend) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("budget");
        commands::init(&root, backend).await.unwrap();
        let config = Config::load(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn root(&self) -> &Path {
        self.config.root()
    }

    /// Reads the stored budget back without rolling it over.
    pub async fn load(&self) -> AppData {
        let storage = Storage::open(&self.config).await.unwrap();
        Budget::open(storage, Month::current())
            .await
            .unwrap()
            .data()
            .clone()
    }
}

#[tokio::test]
async fn test_sqlite_env() {
    let env = TestEnv::with_backend(Backend::Sqlite).await;
    assert!(env.config().data_path().ends_with("budget.sqlite"));
    assert!(env.load().await.app_state().has_completed_setup());
}
