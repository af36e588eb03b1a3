//! Error types.
//!
//! Plumbing errors (filesystem, storage backends, configuration) are carried as `anyhow::Error`
//! with context attached. The typed errors below are the ones a caller is expected to branch on:
//! bad user input, collection rules that refuse a change, and an import file that could not be
//! recognized. They can be recovered from an `anyhow::Error` with `downcast_ref`.

use crate::model::RecordKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The record field that a `ValidationError` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Amount,
    DefaultAmount,
    CurrentAmount,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

/// User input that does not satisfy the schema of a record. Always recoverable: the caller shows
/// `reason` next to `field` and nothing is changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    field: Field,
    reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A change that is well-formed on its own but is refused by the collection it would be applied
/// to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("{kind} named '{name}' already exists")]
    DuplicateName { kind: RecordKind, name: String },

    #[error("{kind} with id {id} was not found")]
    NotFound { kind: RecordKind, id: Uuid },

    #[error("'{name}' is a paycheck and cannot be deleted")]
    ProtectedPaycheck { name: String },
}

/// The reason an import file was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportError {
    #[error("no income, bills or savings could be found in the file")]
    Unrecognized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let e = ValidationError::new(Field::DefaultAmount, "must be greater than zero");
        assert_eq!(
            e.to_string(),
            "invalid default_amount: must be greater than zero"
        );
        assert_eq!(e.field(), Field::DefaultAmount);
    }

    #[test]
    fn test_rejected_downcast_from_anyhow() {
        let e: Error = Rejected::ProtectedPaycheck {
            name: "Paycheck 1".to_string(),
        }
        .into();
        let rejected = e.downcast_ref::<Rejected>().unwrap();
        assert!(matches!(rejected, Rejected::ProtectedPaycheck { .. }));
    }
}
