//! Totals derived from the current records. Nothing here is stored; a `Summary` is computed
//! fresh whenever one is asked for.

use crate::model::{Amount, AppData, Bill, Income, Savings};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub income_total: Amount,
    pub bills_total_due: Amount,
    pub bills_total_paid: Amount,
    pub bills_total_remaining: Amount,
    /// Percentage of the amount due that has been paid, 0 to 100.
    pub bills_progress: u32,
    pub savings_total: Amount,
    /// The headline figure: income minus the bills that are still unpaid.
    pub remaining_cash: Amount,
}

impl Summary {
    pub fn new(data: &AppData) -> Self {
        let income_total = income_total(data.income());
        let bills_total_due = bills_total_due(data.bills());
        let bills_total_paid = bills_total_paid(data.bills());
        let bills_total_remaining = bills_total_due - bills_total_paid;
        Self {
            income_total,
            bills_total_due,
            bills_total_paid,
            bills_total_remaining,
            bills_progress: bills_progress(bills_total_paid, bills_total_due),
            savings_total: savings_total(data.savings()),
            remaining_cash: income_total - bills_total_remaining,
        }
    }
}

pub fn income_total(income: &[Income]) -> Amount {
    income.iter().map(Income::current_amount).sum()
}

pub fn bills_total_due(bills: &[Bill]) -> Amount {
    bills.iter().map(Bill::amount).sum()
}

pub fn bills_total_paid(bills: &[Bill]) -> Amount {
    bills.iter().filter(|b| b.paid()).map(Bill::amount).sum()
}

pub fn savings_total(savings: &[Savings]) -> Amount {
    savings.iter().map(Savings::amount).sum()
}

/// `paid / due * 100` rounded half up to a whole percent, or 0 when nothing is due.
pub fn bills_progress(paid: Amount, due: Amount) -> u32 {
    if !due.is_positive() {
        return 0;
    }
    (paid.value() * Decimal::ONE_HUNDRED / due.value())
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
