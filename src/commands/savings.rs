//! Savings command handlers.

use crate::args::{AmountArgs, AmountUpdateArgs, NameArgs};
use crate::command::Command;
use crate::commands::{lookup, open, Out};
use crate::model::{Month, Savings};
use crate::validate::{self, SavingsDraft, SavingsPatch};
use crate::{Config, Result};

/// Adds a savings account. Zero is an acceptable amount.
pub async fn savings_add(config: Config, args: AmountArgs) -> Result<Out<Savings>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let savings = validate::savings(&SavingsDraft {
        name: args.name,
        amount: args.amount,
    })?;
    budget.apply(Command::AddSavings(savings.clone())).await?;
    Ok(Out::new(
        format!("Added savings '{}'", savings.name()),
        savings,
    ))
}

pub async fn savings_update(config: Config, args: AmountUpdateArgs) -> Result<Out<Savings>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let existing = lookup(budget.data().savings(), &args.name)?;
    let updated = validate::savings_update(
        existing,
        &SavingsPatch {
            name: args.rename,
            amount: args.amount,
        },
    )?;
    budget.apply(Command::UpdateSavings(updated.clone())).await?;
    Ok(Out::new(
        format!("Updated savings '{}'", updated.name()),
        updated,
    ))
}

pub async fn savings_delete(config: Config, args: NameArgs) -> Result<Out<Savings>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let existing = lookup(budget.data().savings(), &args.name)?.clone();
    budget.apply(Command::DeleteSavings(existing.id())).await?;
    Ok(Out::new(
        format!("Deleted savings '{}'", existing.name()),
        existing,
    ))
}
