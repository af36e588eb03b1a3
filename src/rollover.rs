//! The month-boundary rollover.
//!
//! When the month the app last ran in differs from the current month, the outgoing month's
//! savings total is appended to the history, every income goes back to its default amount and
//! every bill becomes unpaid. The functions here are pure; `Budget::rollover_if_due` persists the
//! result with a single write before swapping it in.

use crate::model::{AppData, AppState, Month, SavingsHistoryEntry};
use crate::summary::savings_total;
use serde::Serialize;

/// Whether a rollover is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverState {
    Current,
    Due { from: Month, to: Month },
}

/// What `Budget::rollover_if_due` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverStatus {
    Current,
    RolledOver {
        from: Month,
        to: Month,
        snapshot: SavingsHistoryEntry,
    },
}

/// True when the session month is not `now`. Safe to call any number of times.
pub fn needs_reset(state: &AppState, now: Month) -> bool {
    state.last_session_month() != now
}

pub fn check(state: &AppState, now: Month) -> RolloverState {
    if needs_reset(state, now) {
        RolloverState::Due {
            from: state.last_session_month(),
            to: now,
        }
    } else {
        RolloverState::Current
    }
}

/// Builds the rolled-over copy of `data` for the month `now`. This does not check whether a
/// rollover is due; callers go through `needs_reset` first.
pub fn roll_over(data: &AppData, now: Month) -> AppData {
    let mut next = data.clone();
    let outgoing = data.app_state().last_session_month();
    next.app_state.push_history(SavingsHistoryEntry::new(
        outgoing,
        savings_total(data.savings()),
    ));
    for income in next.income.iter_mut() {
        income.reset();
    }
    for bill in next.bills.iter_mut() {
        bill.paid = false;
    }
    next.app_state.last_session_month = now;
    next.app_state.refresh_version_string();
    next
}

/// Rolls `data` over when due and reports what happened. Returns `None` when nothing was due.
pub fn roll_over_if_due(data: &AppData, now: Month) -> Option<(AppData, RolloverStatus)> {
    let RolloverState::Due { from, to } = check(data.app_state(), now) else {
        return None;
    };
    let next = roll_over(data, now);
    let snapshot = *next.app_state().savings_history().last()?;
    Some((next, RolloverStatus::RolledOver { from, to, snapshot }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Bill, Savings, HISTORY_CAP};
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn month(s: &str) -> Month {
        Month::from_str(s).unwrap()
    }

    fn november() -> AppData {
        let mut data = AppData::initial(month("2024-11"));
        data.income[0].default_amount = amount("2500");
        data.income[0].current_amount = amount("1800");
        data.income[1].default_amount = amount("2500");
        data.income[1].current_amount = amount("2500");
        data.bills = vec![
            Bill::new("Rent", amount("1200"), true),
            Bill::new("Phone", amount("150"), false),
        ];
        data.savings = vec![
            Savings::new("Emergency", amount("3000")),
            Savings::new("House", amount("2000")),
        ];
        data
    }

    #[test]
    fn test_needs_reset() {
        let data = november();
        assert!(!needs_reset(data.app_state(), month("2024-11")));
        assert!(needs_reset(data.app_state(), month("2024-12")));
        assert_eq!(
            check(data.app_state(), month("2024-12")),
            RolloverState::Due {
                from: month("2024-11"),
                to: month("2024-12")
            }
        );
    }

    #[test]
    fn test_roll_over_example() {
        let data = november();
        let next = roll_over(&data, month("2024-12"));

        for income in next.income() {
            assert_eq!(income.current_amount(), income.default_amount());
        }
        assert!(next.bills().iter().all(|b| !b.paid()));
        assert_eq!(
            next.app_state().savings_history(),
            &[SavingsHistoryEntry::new(month("2024-11"), amount("5000"))]
        );
        assert_eq!(next.app_state().last_session_month(), month("2024-12"));
        assert_eq!(next.savings(), data.savings());
    }

    #[test]
    fn test_roll_over_is_idempotent_within_a_month() {
        let data = november();
        let (first, status) = roll_over_if_due(&data, month("2024-12")).unwrap();
        assert!(matches!(status, RolloverStatus::RolledOver { .. }));
        assert!(roll_over_if_due(&first, month("2024-12")).is_none());
    }

    #[test]
    fn test_status_reports_snapshot() {
        let data = november();
        let (_, status) = roll_over_if_due(&data, month("2024-12")).unwrap();
        assert_eq!(
            status,
            RolloverStatus::RolledOver {
                from: month("2024-11"),
                to: month("2024-12"),
                snapshot: SavingsHistoryEntry::new(month("2024-11"), amount("5000")),
            }
        );
    }

    #[test]
    fn test_history_stays_capped_over_many_rollovers() {
        let mut data = november();
        let mut now = month("2024-11");
        for _ in 0..20 {
            now = now.next();
            data = roll_over(&data, now);
        }
        let history = data.app_state().savings_history();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.last().unwrap().month(), month("2026-06"));
        assert_eq!(history.first().unwrap().month(), month("2025-07"));
    }

    #[test]
    fn test_skipped_months_record_only_the_outgoing_month() {
        let data = november();
        let next = roll_over(&data, month("2025-03"));
        assert_eq!(next.app_state().savings_history().len(), 1);
        assert_eq!(
            next.app_state().savings_history()[0].month(),
            month("2024-11")
        );
    }
}
