use crate::model::{Amount, Month};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// The number of monthly savings totals that are kept.
pub const HISTORY_CAP: usize = 12;

/// The savings total recorded when a month was rolled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SavingsHistoryEntry {
    month: Month,
    total: Amount,
}

impl SavingsHistoryEntry {
    pub fn new(month: Month, total: Amount) -> Self {
        Self { month, total }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}

/// Application state that is not one of the user's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppState {
    /// The month the app last ran in. Rollover is due whenever this differs from the current
    /// month.
    pub(crate) last_session_month: Month,
    /// Display only; never parsed.
    pub(crate) version_string: String,
    pub(crate) has_completed_setup: bool,
    /// Oldest first, at most `HISTORY_CAP` entries.
    #[serde(default)]
    pub(crate) savings_history: Vec<SavingsHistoryEntry>,
}

impl AppState {
    pub fn new(last_session_month: Month) -> Self {
        Self {
            last_session_month,
            version_string: version_string(),
            has_completed_setup: false,
            savings_history: Vec::new(),
        }
    }

    pub fn last_session_month(&self) -> Month {
        self.last_session_month
    }

    pub fn version_string(&self) -> &str {
        &self.version_string
    }

    pub fn has_completed_setup(&self) -> bool {
        self.has_completed_setup
    }

    pub fn savings_history(&self) -> &[SavingsHistoryEntry] {
        &self.savings_history
    }

    /// Appends `entry`, dropping the oldest entries so that at most `HISTORY_CAP` remain.
    pub(crate) fn push_history(&mut self, entry: SavingsHistoryEntry) {
        self.savings_history.push(entry);
        let overflow = self.savings_history.len().saturating_sub(HISTORY_CAP);
        if overflow > 0 {
            self.savings_history.drain(..overflow);
        }
    }

    pub(crate) fn refresh_version_string(&mut self) {
        self.version_string = version_string();
    }
}

/// Builds a display-only version string, e.g. `0.1.0+20241201093015`.
pub(crate) fn version_string() -> String {
    format!(
        "{}+{}",
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y%m%d%H%M%S")
    )
}
