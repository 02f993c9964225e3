//! Raw input validation, independent of any input surface.
//!
//! Every failing field is reported at once so a form can show all messages
//! together. The store only ever receives the output of [`validate`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transaction::{NewTransaction, Transaction, TransactionId, TransactionKind};

/// Date format accepted for input and used for export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount a single transaction may carry. Keeps totals finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Unvalidated field values as typed by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionInput {
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub is_recurring: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Kind,
    Amount,
    Category,
    Date,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Kind => "type",
            Field::Amount => "amount",
            Field::Category => "category",
            Field::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// One or more field-level failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid transaction: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field.name(), e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validate raw input into a transaction ready for `TransactionStore::add`.
pub fn validate(input: &TransactionInput) -> Result<NewTransaction, ValidationErrors> {
    let mut errors = Vec::new();
    let mut push = |field, message: &str| {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        })
    };

    let kind = TransactionKind::parse(&input.kind);
    if kind.is_none() {
        push(Field::Kind, "must be income or expense");
    }

    let amount = match input.amount.trim().replace(',', ".").parse::<f64>() {
        Ok(a) if !a.is_finite() => {
            push(Field::Amount, "must be a number");
            None
        }
        Ok(a) if a <= 0.0 => {
            push(Field::Amount, "must be positive");
            None
        }
        Ok(a) if a > MAX_AMOUNT => {
            push(Field::Amount, "must be at most 1000000000");
            None
        }
        Ok(a) => Some(a),
        Err(_) => {
            push(Field::Amount, "must be a number");
            None
        }
    };

    let category = input.category.trim();
    if category.is_empty() {
        push(Field::Category, "select a category");
    }

    let date = match NaiveDate::parse_from_str(input.date.trim(), DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            push(Field::Date, "expected yyyy-MM-dd");
            None
        }
    };

    match (kind, amount, date) {
        (Some(kind), Some(amount), Some(date)) if errors.is_empty() => Ok(NewTransaction {
            kind,
            amount,
            category: category.to_string(),
            date,
            is_recurring: input.is_recurring,
            notes: input
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validate input meant to fully replace the transaction with `id`.
pub fn validate_replacement(
    id: TransactionId,
    input: &TransactionInput,
) -> Result<Transaction, ValidationErrors> {
    validate(input).map(|t| t.with_id(id))
}
