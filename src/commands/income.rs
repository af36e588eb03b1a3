//! Income command handlers.

use crate::args::{IncomeAddArgs, IncomeUpdateArgs, NameArgs};
use crate::command::Command;
use crate::commands::{lookup, open, Out};
use crate::model::{Income, Month};
use crate::validate::{self, IncomeDraft, IncomePatch};
use crate::{Config, Result};

/// Adds an "other income" record. The current amount defaults to the default amount.
///
/// # Errors
/// - A `ValidationError` if the name or an amount is invalid.
/// - A `Rejected` error if an income with the same name exists.
pub async fn income_add(config: Config, args: IncomeAddArgs) -> Result<Out<Income>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let income = validate::income(&IncomeDraft {
        name: args.name,
        default_amount: args.default_amount,
        current_amount: args.current_amount,
    })?;
    budget.apply(Command::AddIncome(income.clone())).await?;
    Ok(Out::new(format!("Added income '{}'", income.name()), income))
}

/// Changes the name or amounts of an income. Paychecks keep their paycheck number.
pub async fn income_update(config: Config, args: IncomeUpdateArgs) -> Result<Out<Income>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let existing = lookup(budget.data().income(), &args.name)?;
    let updated = validate::income_update(
        existing,
        &IncomePatch {
            name: args.rename,
            default_amount: args.default_amount,
            current_amount: args.current_amount,
        },
    )?;
    budget.apply(Command::UpdateIncome(updated.clone())).await?;
    Ok(Out::new(format!("Updated income '{}'", updated.name()), updated))
}

/// Removes an income. The two paychecks are refused.
pub async fn income_delete(config: Config, args: NameArgs) -> Result<Out<Income>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let existing = lookup(budget.data().income(), &args.name)?.clone();
    budget.apply(Command::DeleteIncome(existing.id())).await?;
    Ok(Out::new(
        format!("Deleted income '{}'", existing.name()),
        existing,
    ))
}

/// Sets every current amount back to its default amount.
pub async fn income_reset(config: Config) -> Result<Out<Vec<Income>>> {
    let (mut budget, _) = open(&config, Month::current()).await?;
    let income = budget.apply(Command::ResetIncome).await?.income().to_vec();
    Ok(Out::new("Reset income to the default amounts", income))
}
