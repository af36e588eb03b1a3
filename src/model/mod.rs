//! Types that represent the core data model: `Income`, `Bill`, `Savings`, `AppState` and the
//! `AppData` aggregate that holds them all.
mod amount;
mod app_state;
mod bill;
mod income;
mod month;
mod savings;

pub use amount::{Amount, AmountError};
pub use app_state::{AppState, SavingsHistoryEntry, HISTORY_CAP};
pub use bill::Bill;
pub use income::{Income, PaycheckNumber};
pub use month::{Month, MonthError};
pub use savings::Savings;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three kinds of user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Income,
    Bill,
    Savings,
}

serde_plain::derive_display_from_serialize!(RecordKind);
serde_plain::derive_fromstr_from_deserialize!(RecordKind);

/// Behavior shared by the user records, used for id lookup and name uniqueness.
pub trait Record {
    const KIND: RecordKind;

    fn id(&self) -> Uuid;

    fn name(&self) -> &str;

    /// Names are compared trimmed and case-insensitively.
    fn has_name(&self, name: &str) -> bool {
        normalize_name(self.name()) == normalize_name(name)
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Finds a record by name, ignoring case and surrounding whitespace.
pub fn find_by_name<'a, R: Record>(records: &'a [R], name: &str) -> Option<&'a R> {
    records.iter().find(|r| r.has_name(name))
}

/// Finds a record by id.
pub fn find_by_id<R: Record>(records: &[R], id: Uuid) -> Option<&R> {
    records.iter().find(|r| r.id() == id)
}

/// Everything the app stores. This is the unit of load and save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppData {
    pub(crate) income: Vec<Income>,
    pub(crate) bills: Vec<Bill>,
    pub(crate) savings: Vec<Savings>,
    pub(crate) app_state: AppState,
}

impl AppData {
    pub(crate) fn new(
        income: Vec<Income>,
        bills: Vec<Bill>,
        savings: Vec<Savings>,
        app_state: AppState,
    ) -> Self {
        Self {
            income,
            bills,
            savings,
            app_state,
        }
    }

    /// The data of a first run: two zeroed paychecks and `now` as the session month, so that no
    /// rollover is due on first launch.
    pub fn initial(now: Month) -> Self {
        Self::new(
            PaycheckNumber::ALL
                .iter()
                .map(|n| Income::paycheck(*n))
                .collect(),
            Vec::new(),
            Vec::new(),
            AppState::new(now),
        )
    }

    pub fn income(&self) -> &[Income] {
        &self.income
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn savings(&self) -> &[Savings] {
        &self.savings
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub fn paycheck(&self, number: PaycheckNumber) -> Option<&Income> {
        self.income
            .iter()
            .find(|i| i.paycheck_number() == Some(number))
    }

    /// Makes sure that exactly one income record carries each paycheck number. A repeated tag is
    /// removed from every record after the first that carries it, and a missing paycheck is
    /// added with zero amounts at the front of the list.
    pub(crate) fn ensure_paychecks(&mut self) {
        let mut seen = Vec::new();
        for income in self.income.iter_mut() {
            if let Some(number) = income.paycheck_number {
                if seen.contains(&number) {
                    income.paycheck_number = None;
                } else {
                    seen.push(number);
                }
            }
        }
        for (ix, number) in PaycheckNumber::ALL.iter().enumerate() {
            if !seen.contains(number) {
                self.income.insert(ix.min(self.income.len()), Income::paycheck(*number));
            }
        }
    }
}
