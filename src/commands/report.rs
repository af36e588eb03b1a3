//! Read-only views of the budget, plus the explicit rollover.

use crate::commands::{open, Out};
use crate::model::{AppData, Month};
use crate::rollover::RolloverStatus;
use crate::summary::Summary;
use crate::{Config, Result};

pub async fn summary(config: Config) -> Result<Out<Summary>> {
    let (budget, _) = open(&config, Month::current()).await?;
    let summary = budget.summary();
    Ok(Out::new(summary_message(&summary), summary))
}

pub async fn show(config: Config) -> Result<Out<AppData>> {
    let (budget, _) = open(&config, Month::current()).await?;
    let data = budget.data().clone();
    Ok(Out::new(show_message(&data), data))
}

/// `open` already rolls over; this only reports what it did.
pub async fn rollover(config: Config) -> Result<Out<RolloverStatus>> {
    let now = Month::current();
    let (_, status) = open(&config, now).await?;
    let message = match status {
        RolloverStatus::Current => format!("Already up to date for {}", now.label()),
        RolloverStatus::RolledOver { from, to, snapshot } => format!(
            "Rolled over from {} to {}, recorded savings of {} for {}",
            from.label(),
            to.label(),
            snapshot.total().to_money_string(),
            snapshot.month()
        ),
    };
    Ok(Out::new(message, status))
}

fn summary_message(s: &Summary) -> String {
    [
        format!("Total income:    {}", s.income_total.to_money_string()),
        format!("Bills due:       {}", s.bills_total_due.to_money_string()),
        format!(
            "Bills paid:      {} ({}%)",
            s.bills_total_paid.to_money_string(),
            s.bills_progress
        ),
        format!("Bills remaining: {}", s.bills_total_remaining.to_money_string()),
        format!("Savings:         {}", s.savings_total.to_money_string()),
        format!("Remaining cash:  {}", s.remaining_cash.to_money_string()),
    ]
    .join("\n")
}

fn show_message(data: &AppData) -> String {
    let mut lines = vec![format!(
        "Budget for {}",
        data.app_state().last_session_month().label()
    )];

    lines.push("Income:".to_string());
    for i in data.income() {
        let tag = i
            .paycheck_number()
            .map(|n| format!(" [paycheck {n}]"))
            .unwrap_or_default();
        lines.push(format!(
            "  {}{tag}: {} of {}",
            i.name(),
            i.current_amount().to_money_string(),
            i.default_amount().to_money_string()
        ));
    }

    lines.push("Bills:".to_string());
    for b in data.bills() {
        let paid = if b.paid() { "paid" } else { "unpaid" };
        lines.push(format!(
            "  {}: {} ({paid})",
            b.name(),
            b.amount().to_money_string()
        ));
    }

    lines.push("Savings:".to_string());
    for s in data.savings() {
        lines.push(format!("  {}: {}", s.name(), s.amount().to_money_string()));
    }

    let history = data.app_state().savings_history();
    if !history.is_empty() {
        lines.push("Savings history:".to_string());
        for e in history {
            lines.push(format!("  {}: {}", e.month(), e.total().to_money_string()));
        }
    }
    lines.join("\n")
}
