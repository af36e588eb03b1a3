//! Persistence of the `AppData` aggregate.
//!
//! The aggregate is stored as four JSON values under fixed keys in a `KeyValueStore`. Which store
//! is used is decided by `config.json`; everything above `Storage` sees the same interface.

mod json_file;
mod memory;
mod migrations;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::command::Scope;
use crate::model::{AppData, AppState, Bill, Income, Month, Savings};
use crate::{Config, Result};
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

pub const INCOME: &str = "income";
pub const BILLS: &str = "bills";
pub const SAVINGS: &str = "savings";
pub const APP_STATE: &str = "app_state";

/// A minimal async key-value store. Values are JSON.
#[async_trait::async_trait]
pub trait KeyValueStore: Send {
    /// Returns `None` when nothing has been stored under `key`.
    async fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// Stores every entry, or none of them.
    async fn set_many(&mut self, entries: Vec<(String, Value)>) -> Result<()>;
}

/// The kind of `KeyValueStore` that holds the budget.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// A single `budget.json` file.
    #[default]
    Json,
    /// A `budget.sqlite` database.
    Sqlite,
}

serde_plain::derive_display_from_serialize!(Backend);
serde_plain::derive_fromstr_from_deserialize!(Backend);

/// Maps the aggregate onto the keys of a `KeyValueStore`.
pub struct Storage {
    store: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Opens the store that `config` names.
    pub async fn open(config: &Config) -> Result<Self> {
        let path = config.data_path();
        debug!("Opening {} storage at {}", config.backend(), path.display());
        let store: Box<dyn KeyValueStore> = match config.backend() {
            Backend::Json => Box::new(JsonFileStore::new(path)),
            Backend::Sqlite => Box::new(SqliteStore::open(&path).await?),
        };
        Ok(Self::new(store))
    }

    /// Loads the aggregate. `Ok(None)` means nothing has ever been saved. A missing section falls
    /// back to its empty value, and a missing `app_state` starts at the current month.
    pub async fn try_load_all(&mut self) -> Result<Option<AppData>> {
        let income: Option<Vec<Income>> = self.get_section(INCOME).await?;
        let bills: Option<Vec<Bill>> = self.get_section(BILLS).await?;
        let savings: Option<Vec<Savings>> = self.get_section(SAVINGS).await?;
        let app_state: Option<AppState> = self.get_section(APP_STATE).await?;

        if income.is_none() && bills.is_none() && savings.is_none() && app_state.is_none() {
            debug!("Nothing has been stored yet");
            return Ok(None);
        }

        let mut data = AppData::new(
            income.unwrap_or_default(),
            bills.unwrap_or_default(),
            savings.unwrap_or_default(),
            app_state.unwrap_or_else(|| AppState::new(Month::current())),
        );
        data.ensure_paychecks();
        Ok(Some(data))
    }

    /// Like `try_load_all`, but a read failure is logged and reported as `None`.
    pub async fn load_all(&mut self) -> Option<AppData> {
        match self.try_load_all().await {
            Ok(data) => data,
            Err(e) => {
                warn!("Unable to load the stored budget: {e:#}");
                None
            }
        }
    }

    /// Writes all four sections in one batch.
    pub async fn save_all(&mut self, data: &AppData) -> Result<()> {
        self.save_scope(Scope::All, data).await
    }

    pub async fn save_income(&mut self, income: &[Income]) -> Result<()> {
        self.store.set_many(vec![entry(INCOME, income)?]).await
    }

    pub async fn save_bills(&mut self, bills: &[Bill]) -> Result<()> {
        self.store.set_many(vec![entry(BILLS, bills)?]).await
    }

    pub async fn save_savings(&mut self, savings: &[Savings]) -> Result<()> {
        self.store.set_many(vec![entry(SAVINGS, savings)?]).await
    }

    pub async fn save_app_state(&mut self, app_state: &AppState) -> Result<()> {
        self.store.set_many(vec![entry(APP_STATE, app_state)?]).await
    }

    /// Writes the sections of `data` that `scope` covers.
    pub async fn save_scope(&mut self, scope: Scope, data: &AppData) -> Result<()> {
        trace!("Saving scope {scope}");
        match scope {
            Scope::Income => self.save_income(data.income()).await,
            Scope::Bills => self.save_bills(data.bills()).await,
            Scope::Savings => self.save_savings(data.savings()).await,
            Scope::AppState => self.save_app_state(data.app_state()).await,
            Scope::All => {
                let entries = vec![
                    entry(INCOME, data.income())?,
                    entry(BILLS, data.bills())?,
                    entry(SAVINGS, data.savings())?,
                    entry(APP_STATE, data.app_state())?,
                ];
                self.store.set_many(entries).await
            }
        }
    }

    async fn get_section<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .with_context(|| format!("The stored '{key}' section is malformed")),
        }
    }
}

fn entry<T>(key: &str, value: &T) -> Result<(String, Value)>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(value)
        .with_context(|| format!("Unable to serialize the '{key}' section"))?;
    Ok((key.to_string(), value))
}
