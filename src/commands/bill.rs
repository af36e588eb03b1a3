//! Bill command handlers.

use crate::args::{AmountArgs, AmountUpdateArgs, NameArgs};
use crate::command::Command;
use crate::commands::{lookup, open, Out};
use crate::model::{Bill, Month};
use crate::validate::{self, BillDraft, BillPatch};
use crate::{Config, Result};

/// Adds a bill. New bills are unpaid.
pub async fn bill_add(config: Config, args: AmountArgs) -> Result<Out<Bill>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let bill = validate::bill(&BillDraft {
        name: args.name,
        amount: args.amount,
    })?;
    budget.apply(Command::AddBill(bill.clone())).await?;
    Ok(Out::new(format!("Added bill '{}'", bill.name()), bill))
}

pub async fn bill_update(config: Config, args: AmountUpdateArgs) -> Result<Out<Bill>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let existing = lookup(budget.data().bills(), &args.name)?;
    let updated = validate::bill_update(
        existing,
        &BillPatch {
            name: args.rename,
            amount: args.amount,
        },
    )?;
    budget.apply(Command::UpdateBill(updated.clone())).await?;
    Ok(Out::new(format!("Updated bill '{}'", updated.name()), updated))
}

pub async fn bill_delete(config: Config, args: NameArgs) -> Result<Out<Bill>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let existing = lookup(budget.data().bills(), &args.name)?.clone();
    budget.apply(Command::DeleteBill(existing.id())).await?;
    Ok(Out::new(format!("Deleted bill '{}'", existing.name()), existing))
}

/// Flips a bill between paid and unpaid.
pub async fn bill_toggle(config: Config, args: NameArgs) -> Result<Out<Bill>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let id = lookup(budget.data().bills(), &args.name)?.id();
    let data = budget.apply(Command::ToggleBillPaid(id)).await?;
    let bill = lookup(data.bills(), &args.name)?.clone();
    let state = if bill.paid() { "paid" } else { "unpaid" };
    Ok(Out::new(
        format!("Marked bill '{}' {state}", bill.name()),
        bill,
    ))
}
