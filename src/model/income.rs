use crate::model::{Amount, Record, RecordKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Tags one of the two protected paycheck records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaycheckNumber {
    One,
    Two,
}

impl PaycheckNumber {
    pub const ALL: [PaycheckNumber; 2] = [PaycheckNumber::One, PaycheckNumber::Two];

    /// Only exactly `1` or `2` name a paycheck.
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(PaycheckNumber::One),
            2 => Some(PaycheckNumber::Two),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            PaycheckNumber::One => 1,
            PaycheckNumber::Two => 2,
        }
    }
}

impl Display for PaycheckNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl TryFrom<u8> for PaycheckNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PaycheckNumber::from_number(i64::from(value))
            .ok_or_else(|| format!("{value} is not a paycheck number"))
    }
}

impl From<PaycheckNumber> for u8 {
    fn from(value: PaycheckNumber) -> Self {
        value.number()
    }
}

/// A source of income. Records tagged with a `paycheck_number` are the two protected paychecks;
/// the rest are "other income".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Income {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) default_amount: Amount,
    pub(crate) current_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) paycheck_number: Option<PaycheckNumber>,
}

impl Income {
    pub(crate) fn new(
        name: impl Into<String>,
        default_amount: Amount,
        current_amount: Amount,
        paycheck_number: Option<PaycheckNumber>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            default_amount,
            current_amount,
            paycheck_number,
        }
    }

    /// A fresh protected paycheck with zero amounts.
    pub(crate) fn paycheck(number: PaycheckNumber) -> Self {
        Self::new(
            format!("Paycheck {number}"),
            Amount::ZERO,
            Amount::ZERO,
            Some(number),
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_amount(&self) -> Amount {
        self.default_amount
    }

    pub fn current_amount(&self) -> Amount {
        self.current_amount
    }

    pub fn paycheck_number(&self) -> Option<PaycheckNumber> {
        self.paycheck_number
    }

    /// Paychecks cannot be deleted.
    pub fn is_protected(&self) -> bool {
        self.paycheck_number.is_some()
    }

    pub(crate) fn reset(&mut self) {
        self.current_amount = self.default_amount;
    }
}

impl Record for Income {
    const KIND: RecordKind = RecordKind::Income;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_paycheck_defaults() {
        let p = Income::paycheck(PaycheckNumber::Two);
        assert_eq!(p.name(), "Paycheck 2");
        assert!(p.default_amount().is_zero());
        assert!(p.current_amount().is_zero());
        assert!(p.is_protected());
    }

    #[test]
    fn test_reset() {
        let mut income = Income::new(
            "Side gig",
            Amount::from_str("300").unwrap(),
            Amount::from_str("120").unwrap(),
            None,
        );
        income.reset();
        assert_eq!(income.current_amount(), income.default_amount());
        assert!(!income.is_protected());
    }

    #[test]
    fn test_paycheck_number_serde() {
        let json = serde_json::to_string(&PaycheckNumber::Two).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<PaycheckNumber>("3").is_err());
    }

    #[test]
    fn test_untagged_income_omits_paycheck_number() {
        let income = Income::new("Tips", Amount::ZERO, Amount::ZERO, None);
        let json = serde_json::to_string(&income).unwrap();
        assert!(!json.contains("paycheck_number"));
    }
}
