//! Command handlers for the budget CLI.
//!
//! This module contains implementations for all CLI subcommands. Every handler except `init`
//! opens the budget through `open`, which performs the month rollover before anything else.

mod bill;
mod income;
mod init;
mod report;
mod savings;
mod transfer;

use crate::model::{find_by_name, Month, Record};
use crate::rollover::RolloverStatus;
use crate::store::Storage;
use crate::{Budget, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use bill::{bill_add, bill_delete, bill_toggle, bill_update};
pub use income::{income_add, income_delete, income_reset, income_update};
pub use init::init;
pub use report::{rollover, show, summary};
pub use savings::{savings_add, savings_delete, savings_update};
pub use transfer::{export, import};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Opens the budget described by `config` and rolls it over to `now` if a new month started.
pub(crate) async fn open(config: &Config, now: Month) -> Result<(Budget, RolloverStatus)> {
    let storage = Storage::open(config).await?;
    let mut budget = Budget::open(storage, now)
        .await?
        .with_backup(config.backup());
    let status = budget.rollover_if_due(now).await?;
    Ok((budget, status))
}

/// Finds the record named `name`, ignoring case, or explains that there is none.
fn lookup<'a, R: Record>(records: &'a [R], name: &str) -> Result<&'a R> {
    find_by_name(records, name).with_context(|| format!("There is no {} named '{name}'", R::KIND))
}

/// "1 bill", "2 bills".
fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{count} {}", if count == 1 { singular } else { plural })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "bill", "bills"), "1 bill");
        assert_eq!(plural(0, "entry", "entries"), "0 entries");
    }

    #[test]
    fn test_out_from_message() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }

    #[tokio::test]
    async fn test_open_rolls_over() {
        let env = TestEnv::new().await;
        let now = Month::current();
        let (budget, status) = open(&env.config(), now).await.unwrap();
        assert_eq!(status, RolloverStatus::Current);
        assert_eq!(budget.data().app_state().last_session_month(), now);

        let (budget, status) = open(&env.config(), now.next()).await.unwrap();
        assert!(matches!(status, RolloverStatus::RolledOver { .. }));
        assert_eq!(budget.data().app_state().last_session_month(), now.next());
    }
}
