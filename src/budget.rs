//! The `Budget` container: it owns the in-memory `AppData` and the `Storage` it came from.
//!
//! Every change follows the same order: build the next state, persist it, then swap it in. If
//! persisting fails the in-memory state is left as it was.

use crate::backup::{Backup, PRE_IMPORT};
use crate::codec;
use crate::command::{self, Command};
use crate::error::ImportError;
use crate::model::{AppData, Month};
use crate::rollover::{self, RolloverState, RolloverStatus};
use crate::store::Storage;
use crate::summary::Summary;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Counts of what an import brought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub income: usize,
    pub bills: usize,
    pub savings: usize,
    pub history: usize,
}

impl ImportReport {
    fn new(data: &AppData) -> Self {
        Self {
            income: data.income().len(),
            bills: data.bills().len(),
            savings: data.savings().len(),
            history: data.app_state().savings_history().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported(ImportReport),
    /// The file was not usable. Nothing was changed.
    Failed(ImportError),
    /// No file was picked.
    Cancelled,
}

pub struct Budget {
    data: AppData,
    storage: Storage,
    backup: Option<Backup>,
}

impl Budget {
    /// Loads the budget from `storage`. On the first run the initial budget for `now` is created
    /// and saved. If the stored budget cannot be read, an initial budget is used in memory and
    /// nothing is written until the next change.
    pub async fn open(mut storage: Storage, now: Month) -> Result<Self> {
        let data = match storage.try_load_all().await {
            Ok(Some(data)) => {
                debug!(
                    "Loaded a budget last used in {}",
                    data.app_state().last_session_month()
                );
                data
            }
            Ok(None) => {
                info!("No saved budget found, starting a new one for {now}");
                let data = AppData::initial(now);
                storage
                    .save_all(&data)
                    .await
                    .context("Unable to save the new budget")?;
                data
            }
            Err(e) => {
                warn!("Unable to load the saved budget, starting from an empty one: {e:#}");
                AppData::initial(now)
            }
        };
        Ok(Self {
            data,
            storage,
            backup: None,
        })
    }

    /// Snapshots taken before an import go to `backup`.
    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn summary(&self) -> Summary {
        Summary::new(&self.data)
    }

    pub fn rollover_state(&self, now: Month) -> RolloverState {
        rollover::check(self.data.app_state(), now)
    }

    /// Applies `command`, saving only the part of the data it changes.
    ///
    /// # Errors
    /// - A `Rejected` error (recoverable with `downcast_ref`) when the collection refuses the
    ///   change.
    /// - Any storage error. In both cases nothing is changed.
    pub async fn apply(&mut self, command: Command) -> Result<&AppData> {
        let scope = command.scope();
        let next = command::reduce(&self.data, command)?;
        self.storage
            .save_scope(scope, &next)
            .await
            .with_context(|| format!("Unable to save {scope}"))?;
        self.data = next;
        Ok(&self.data)
    }

    /// Rolls the budget over to `now` if the session month is a different month. Calling this
    /// again in the same month does nothing.
    pub async fn rollover_if_due(&mut self, now: Month) -> Result<RolloverStatus> {
        let Some((next, status)) = rollover::roll_over_if_due(&self.data, now) else {
            return Ok(RolloverStatus::Current);
        };
        let from = self.data.app_state().last_session_month();
        if now < from {
            warn!("The clock reads {now}, which is before the last session month {from}");
        }
        self.storage
            .save_all(&next)
            .await
            .context("Unable to save the rolled over budget")?;
        self.data = next;
        info!("Rolled the budget over from {from} to {now}");
        Ok(status)
    }

    /// The budget as CSV text, labelled with `now`.
    pub fn export_csv(&self, now: Month) -> String {
        codec::to_csv(&self.data, now)
    }

    /// Replaces the whole budget with the contents of `picked`. `None` means the user did not
    /// pick a file.
    ///
    /// A file that cannot be used gives `ImportOutcome::Failed`, not an error. Errors are
    /// reserved for backup and storage failures, which also leave the budget untouched.
    pub async fn import_csv(&mut self, picked: Option<&str>, now: Month) -> Result<ImportOutcome> {
        let Some(text) = picked else {
            debug!("No file was picked, nothing to import");
            return Ok(ImportOutcome::Cancelled);
        };

        let data = match codec::parse(text, now) {
            Ok(data) => data,
            Err(e) => {
                warn!("Nothing was imported: {e}");
                return Ok(ImportOutcome::Failed(e));
            }
        };

        if let Some(backup) = &self.backup {
            let path = backup
                .save_json(PRE_IMPORT, &self.data)
                .await
                .context("Unable to back up the budget before importing")?;
            debug!("Saved backup to {}", path.display());
        }

        let report = ImportReport::new(&data);
        self.apply(Command::Replace(data)).await?;
        Ok(ImportOutcome::Imported(report))
    }
}
