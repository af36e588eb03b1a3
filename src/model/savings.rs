use crate::model::{Amount, Record, RecordKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings account balance. Only ever changed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Savings {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) amount: Amount,
}

impl Savings {
    pub(crate) fn new(name: impl Into<String>, amount: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Record for Savings {
    const KIND: RecordKind = RecordKind::Savings;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
