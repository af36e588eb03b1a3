use crate::model::{Amount, Record, RecordKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recurring bill that is either paid or unpaid for the current month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Bill {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) amount: Amount,
    pub(crate) paid: bool,
}

impl Bill {
    pub(crate) fn new(name: impl Into<String>, amount: Amount, paid: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            paid,
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

    pub fn paid(&self) -> bool {
        self.paid
    }
}

impl Record for Bill {
    const KIND: RecordKind = RecordKind::Bill;

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
