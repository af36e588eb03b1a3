use crate::command::Command;
use crate::commands::Out;
use crate::model::Month;
use crate::store::{Backend, Storage};
use crate::{Budget, Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the budget home directory and its subdirectories, writes `config.json` selecting
/// `backend`, and saves an initial budget with two zeroed paychecks.
///
/// # Errors
/// - Returns an error if `budget_home` already holds a config file.
/// - Returns an error if any file or storage operation fails.
pub async fn init(budget_home: &Path, backend: Backend) -> Result<Out<()>> {
    let config = Config::create(budget_home, backend)
        .await
        .context("Unable to create the budget home directory and config")?;
    let storage = Storage::open(&config).await?;
    let mut budget = Budget::open(storage, Month::current()).await?;
    budget.apply(Command::CompleteSetup).await?;
    Ok(format!(
        "Created a new budget in {} using {} storage",
        config.root().display(),
        config.backend()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_sqlite() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget");
        init(&home, Backend::Sqlite).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        assert!(config.data_path().is_file());
        let storage = Storage::open(&config).await.unwrap();
        let budget = Budget::open(storage, Month::current()).await.unwrap();
        assert!(budget.data().app_state().has_completed_setup());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), Backend::Json).await.unwrap();
        assert!(init(dir.path(), Backend::Json).await.is_err());
    }
}
