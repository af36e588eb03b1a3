//! Schema checks for building and updating records from untrusted input.
//!
//! Every function here is pure: it looks only at its arguments and returns either a validated
//! record or a `ValidationError`. Name uniqueness depends on the rest of the collection, so it is
//! checked when a command is applied (see `command::reduce`), not here.

use crate::error::{Field, ValidationError};
use crate::model::{Amount, Bill, Income, Savings};
use rust_decimal::Decimal;
use std::str::FromStr;

/// The longest name allowed, in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 32;

/// The largest magnitude an amount may have: 999,999,999.99.
pub fn max_amount() -> Amount {
    Amount::new(Decimal::new(99_999_999_999, 2))
}

/// Which amounts are acceptable for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Greater than zero.
    Positive,
    /// Zero or greater.
    NonNegative,
}

/// Trims `raw` and checks it is 1 to 32 characters of letters, digits, spaces and dashes.
pub fn name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(Field::Name, "a name is required"));
    }
    let len = trimmed.chars().count();
    if len > NAME_MAX_CHARS {
        return Err(ValidationError::new(
            Field::Name,
            format!("must be at most {NAME_MAX_CHARS} characters, found {len}"),
        ));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == ' ' || *c == '-'))
    {
        return Err(ValidationError::new(
            Field::Name,
            format!("may only contain letters, numbers, spaces and dashes, found '{bad}'"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Parses `raw` as a plain decimal number with at most two decimal places and checks it against
/// the magnitude cap and `sign`.
pub fn amount(field: Field, raw: &str, sign: Sign) -> Result<Amount, ValidationError> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .map(Amount::new)
        .map_err(|_| ValidationError::new(field, format!("'{trimmed}' is not a number")))?;
    if !value.is_whole_cents() {
        return Err(ValidationError::new(
            field,
            "may have at most two decimal places",
        ));
    }
    if value.value().abs() > max_amount().value() {
        return Err(ValidationError::new(
            field,
            format!("may not exceed {}", max_amount().to_money_string()),
        ));
    }
    match sign {
        Sign::Positive if !value.is_positive() => Err(ValidationError::new(
            field,
            "must be greater than zero",
        )),
        Sign::NonNegative if value.is_negative() => {
            Err(ValidationError::new(field, "may not be negative"))
        }
        _ => Ok(value),
    }
}

/// Raw input for a new "other income" record. When `current_amount` is absent it starts equal to
/// the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeDraft {
    pub name: String,
    pub default_amount: String,
    pub current_amount: Option<String>,
}

/// Raw changes to an income record. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomePatch {
    pub name: Option<String>,
    pub default_amount: Option<String>,
    pub current_amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillDraft {
    pub name: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillPatch {
    pub name: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavingsDraft {
    pub name: String,
    pub amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavingsPatch {
    pub name: Option<String>,
    pub amount: Option<String>,
}

pub fn income(draft: &IncomeDraft) -> Result<Income, ValidationError> {
    let name = name(&draft.name)?;
    let default_amount = amount(Field::DefaultAmount, &draft.default_amount, Sign::Positive)?;
    let current_amount = match &draft.current_amount {
        Some(raw) => amount(Field::CurrentAmount, raw, Sign::Positive)?,
        None => default_amount,
    };
    Ok(Income::new(name, default_amount, current_amount, None))
}

/// Applies `patch` to a copy of `existing`. The id and paycheck number are kept.
pub fn income_update(existing: &Income, patch: &IncomePatch) -> Result<Income, ValidationError> {
    let mut updated = existing.clone();
    if let Some(raw) = &patch.name {
        updated.name = name(raw)?;
    }
    if let Some(raw) = &patch.default_amount {
        updated.default_amount = amount(Field::DefaultAmount, raw, Sign::Positive)?;
    }
    if let Some(raw) = &patch.current_amount {
        updated.current_amount = amount(Field::CurrentAmount, raw, Sign::Positive)?;
    }
    Ok(updated)
}

/// A new bill always starts unpaid.
pub fn bill(draft: &BillDraft) -> Result<Bill, ValidationError> {
    let name = name(&draft.name)?;
    let amount = amount(Field::Amount, &draft.amount, Sign::Positive)?;
    Ok(Bill::new(name, amount, false))
}

pub fn bill_update(existing: &Bill, patch: &BillPatch) -> Result<Bill, ValidationError> {
    let mut updated = existing.clone();
    if let Some(raw) = &patch.name {
        updated.name = name(raw)?;
    }
    if let Some(raw) = &patch.amount {
        updated.amount = amount(Field::Amount, raw, Sign::Positive)?;
    }
    Ok(updated)
}

pub fn savings(draft: &SavingsDraft) -> Result<Savings, ValidationError> {
    let name = name(&draft.name)?;
    let amount = amount(Field::Amount, &draft.amount, Sign::NonNegative)?;
    Ok(Savings::new(name, amount))
}

pub fn savings_update(existing: &Savings, patch: &SavingsPatch) -> Result<Savings, ValidationError> {
    let mut updated = existing.clone();
    if let Some(raw) = &patch.name {
        updated.name = name(raw)?;
    }
    if let Some(raw) = &patch.amount {
        updated.amount = amount(Field::Amount, raw, Sign::NonNegative)?;
    }
    Ok(updated)
}
