//! Every change to the budget is a `Command`. `reduce` turns the current `AppData` and a command
//! into the next `AppData` without touching storage; `Budget::apply` persists the result.
//!
//! Records carried by a command have already passed through `validate`. The rules checked here
//! are the ones that depend on the rest of the collection: unique names, existing ids and the
//! protected paychecks.

use crate::error::Rejected;
use crate::model::{AppData, Bill, Income, Month, Record, Savings};
use crate::rollover;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddIncome(Income),
    /// Replaces the income with the same id. The stored paycheck number is kept.
    UpdateIncome(Income),
    DeleteIncome(Uuid),
    AddBill(Bill),
    /// Replaces the bill with the same id. The paid flag is taken from the given bill.
    UpdateBill(Bill),
    DeleteBill(Uuid),
    ToggleBillPaid(Uuid),
    AddSavings(Savings),
    UpdateSavings(Savings),
    DeleteSavings(Uuid),
    /// Sets every income's current amount back to its default.
    ResetIncome,
    CompleteSetup,
    /// Rolls over to the given month if it differs from the session month.
    Rollover(Month),
    /// Swaps in a whole new aggregate, as an import does.
    Replace(AppData),
}

/// The part of the stored data that a command changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Income,
    Bills,
    Savings,
    AppState,
    All,
}

serde_plain::derive_display_from_serialize!(Scope);
serde_plain::derive_fromstr_from_deserialize!(Scope);

impl Command {
    pub fn scope(&self) -> Scope {
        match self {
            Command::AddIncome(_)
            | Command::UpdateIncome(_)
            | Command::DeleteIncome(_)
            | Command::ResetIncome => Scope::Income,
            Command::AddBill(_)
            | Command::UpdateBill(_)
            | Command::DeleteBill(_)
            | Command::ToggleBillPaid(_) => Scope::Bills,
            Command::AddSavings(_) | Command::UpdateSavings(_) | Command::DeleteSavings(_) => {
                Scope::Savings
            }
            Command::CompleteSetup => Scope::AppState,
            Command::Rollover(_) | Command::Replace(_) => Scope::All,
        }
    }
}

/// Returns the state that results from applying `command` to `data`. `data` itself is never
/// changed, so a rejected command leaves nothing to undo.
pub fn reduce(data: &AppData, command: Command) -> Result<AppData, Rejected> {
    let mut next = data.clone();
    match command {
        Command::AddIncome(income) => insert(&mut next.income, income)?,
        Command::UpdateIncome(mut income) => {
            let ix = position(&next.income, income.id)?;
            income.paycheck_number = next.income[ix].paycheck_number;
            replace(&mut next.income, ix, income)?;
        }
        Command::DeleteIncome(id) => {
            let ix = position(&next.income, id)?;
            if next.income[ix].is_protected() {
                return Err(Rejected::ProtectedPaycheck {
                    name: next.income[ix].name().to_string(),
                });
            }
            next.income.remove(ix);
        }
        Command::AddBill(bill) => insert(&mut next.bills, bill)?,
        Command::UpdateBill(bill) => {
            let ix = position(&next.bills, bill.id)?;
            replace(&mut next.bills, ix, bill)?;
        }
        Command::DeleteBill(id) => {
            let ix = position(&next.bills, id)?;
            next.bills.remove(ix);
        }
        Command::ToggleBillPaid(id) => {
            let ix = position(&next.bills, id)?;
            next.bills[ix].paid = !next.bills[ix].paid;
        }
        Command::AddSavings(savings) => insert(&mut next.savings, savings)?,
        Command::UpdateSavings(savings) => {
            let ix = position(&next.savings, savings.id)?;
            replace(&mut next.savings, ix, savings)?;
        }
        Command::DeleteSavings(id) => {
            let ix = position(&next.savings, id)?;
            next.savings.remove(ix);
        }
        Command::ResetIncome => {
            for income in next.income.iter_mut() {
                income.reset();
            }
        }
        Command::CompleteSetup => next.app_state.has_completed_setup = true,
        Command::Rollover(now) => {
            if let Some((rolled, _)) = rollover::roll_over_if_due(&next, now) {
                next = rolled;
            }
        }
        Command::Replace(replacement) => next = replacement,
    }
    Ok(next)
}

fn position<R: Record>(records: &[R], id: Uuid) -> Result<usize, Rejected> {
    records
        .iter()
        .position(|r| r.id() == id)
        .ok_or(Rejected::NotFound { kind: R::KIND, id })
}

/// Fails if a record other than `candidate` already uses its name.
fn ensure_unique<R: Record>(records: &[R], candidate: &R) -> Result<(), Rejected> {
    let taken = records
        .iter()
        .any(|r| r.id() != candidate.id() && r.has_name(candidate.name()));
    if taken {
        return Err(Rejected::DuplicateName {
            kind: R::KIND,
            name: candidate.name().to_string(),
        });
    }
    Ok(())
}

fn insert<R: Record>(records: &mut Vec<R>, record: R) -> Result<(), Rejected> {
    ensure_unique(records, &record)?;
    records.push(record);
    Ok(())
}

fn replace<R: Record>(records: &mut [R], ix: usize, record: R) -> Result<(), Rejected> {
    ensure_unique(records, &record)?;
    records[ix] = record;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{find_by_name, Amount, PaycheckNumber, RecordKind};
    use crate::validate::{self, BillDraft, IncomeDraft, IncomePatch, SavingsDraft};
    use std::str::FromStr;

    fn month(s: &str) -> Month {
        Month::from_str(s).unwrap()
    }

    fn bill(name: &str, amount: &str) -> Bill {
        validate::bill(&BillDraft {
            name: name.to_string(),
            amount: amount.to_string(),
        })
        .unwrap()
    }

    fn data() -> AppData {
        let data = AppData::initial(month("2024-11"));
        reduce(&data, Command::AddBill(bill("Rent", "1200"))).unwrap()
    }

    #[test]
    fn test_scope() {
        assert_eq!(Command::ResetIncome.scope(), Scope::Income);
        assert_eq!(Command::ToggleBillPaid(Uuid::new_v4()).scope(), Scope::Bills);
        assert_eq!(Command::DeleteSavings(Uuid::new_v4()).scope(), Scope::Savings);
        assert_eq!(Command::CompleteSetup.scope(), Scope::AppState);
        assert_eq!(Command::Rollover(month("2024-12")).scope(), Scope::All);
        assert_eq!(Scope::AppState.to_string(), "app_state");
    }

    #[test]
    fn test_add_bill_duplicate_name_rejected() {
        let data = data();
        let e = reduce(&data, Command::AddBill(bill("  rent ", "5"))).unwrap_err();
        assert_eq!(
            e,
            Rejected::DuplicateName {
                kind: RecordKind::Bill,
                name: "rent".to_string()
            }
        );
    }

    #[test]
    fn test_same_name_allowed_across_collections() {
        let data = data();
        let savings = validate::savings(&SavingsDraft {
            name: "Rent".to_string(),
            amount: "0".to_string(),
        })
        .unwrap();
        let next = reduce(&data, Command::AddSavings(savings)).unwrap();
        assert_eq!(next.savings().len(), 1);
    }

    #[test]
    fn test_toggle_bill_paid() {
        let data = data();
        let id = data.bills()[0].id();
        let paid = reduce(&data, Command::ToggleBillPaid(id)).unwrap();
        assert!(paid.bills()[0].paid());
        let unpaid = reduce(&paid, Command::ToggleBillPaid(id)).unwrap();
        assert!(!unpaid.bills()[0].paid());
        assert!(!data.bills()[0].paid());
    }

    #[test]
    fn test_missing_id_rejected() {
        let data = data();
        let id = Uuid::new_v4();
        assert_eq!(
            reduce(&data, Command::DeleteBill(id)).unwrap_err(),
            Rejected::NotFound {
                kind: RecordKind::Bill,
                id
            }
        );
    }

    #[test]
    fn test_paycheck_cannot_be_deleted() {
        let data = data();
        let id = data.paycheck(PaycheckNumber::Two).unwrap().id();
        let e = reduce(&data, Command::DeleteIncome(id)).unwrap_err();
        assert!(matches!(e, Rejected::ProtectedPaycheck { .. }));
    }

    #[test]
    fn test_other_income_can_be_deleted() {
        let data = data();
        let gig = validate::income(&IncomeDraft {
            name: "Side gig".to_string(),
            default_amount: "300".to_string(),
            current_amount: None,
        })
        .unwrap();
        let id = gig.id();
        let next = reduce(&data, Command::AddIncome(gig)).unwrap();
        assert_eq!(next.income().len(), 3);
        let next = reduce(&next, Command::DeleteIncome(id)).unwrap();
        assert_eq!(next.income().len(), 2);
    }

    #[test]
    fn test_update_income_keeps_paycheck_tag() {
        let data = data();
        let paycheck = data.paycheck(PaycheckNumber::One).unwrap();
        let mut updated = validate::income_update(
            paycheck,
            &IncomePatch {
                name: Some("Main job".to_string()),
                default_amount: Some("2500".to_string()),
                current_amount: Some("1800".to_string()),
            },
        )
        .unwrap();
        updated.paycheck_number = None;
        let next = reduce(&data, Command::UpdateIncome(updated)).unwrap();
        let main = find_by_name(next.income(), "main job").unwrap();
        assert_eq!(main.paycheck_number(), Some(PaycheckNumber::One));
        assert_eq!(main.current_amount(), Amount::from_str("1800").unwrap());
    }

    #[test]
    fn test_rename_to_own_name_with_different_case() {
        let data = data();
        let mut rent = data.bills()[0].clone();
        rent.name = "RENT".to_string();
        let next = reduce(&data, Command::UpdateBill(rent)).unwrap();
        assert_eq!(next.bills()[0].name(), "RENT");
    }

    #[test]
    fn test_rename_onto_other_record_rejected() {
        let data = reduce(&data(), Command::AddBill(bill("Phone", "50"))).unwrap();
        let mut phone = data.bills()[1].clone();
        phone.name = "Rent".to_string();
        assert!(matches!(
            reduce(&data, Command::UpdateBill(phone)).unwrap_err(),
            Rejected::DuplicateName { .. }
        ));
    }

    #[test]
    fn test_reset_income() {
        let mut data = data();
        data.income[0].default_amount = Amount::from_str("2500").unwrap();
        data.income[0].current_amount = Amount::from_str("10").unwrap();
        let next = reduce(&data, Command::ResetIncome).unwrap();
        assert_eq!(next.income()[0].current_amount(), next.income()[0].default_amount());
    }

    #[test]
    fn test_complete_setup() {
        let data = data();
        assert!(!data.app_state().has_completed_setup());
        let next = reduce(&data, Command::CompleteSetup).unwrap();
        assert!(next.app_state().has_completed_setup());
    }

    #[test]
    fn test_rollover_command_only_when_due() {
        let data = data();
        let data = reduce(&data, Command::ToggleBillPaid(data.bills()[0].id())).unwrap();
        let same = reduce(&data, Command::Rollover(month("2024-11"))).unwrap();
        assert_eq!(same, data);
        let next = reduce(&data, Command::Rollover(month("2024-12"))).unwrap();
        assert!(!next.bills()[0].paid());
        assert_eq!(next.app_state().last_session_month(), month("2024-12"));
    }

    #[test]
    fn test_replace() {
        let data = data();
        let other = AppData::initial(month("2020-01"));
        let next = reduce(&data, Command::Replace(other.clone())).unwrap();
        assert_eq!(next, other);
    }
}
