//! Wire schema for the advice service, and how it is built from the
//! recorded transactions.

use saldo_core::{Transaction, TransactionKind};
use serde::{Deserialize, Serialize};

use crate::error::AdviceError;

/// Shortest goals text (in characters, after trimming) worth sending.
pub const MIN_GOALS_CHARS: usize = 10;

/// Label sent when no period is configured.
pub const DEFAULT_TIME_PERIOD: &str = "mensal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    pub income: f64,
    pub expenses: Vec<ExpenseEntry>,
    pub goals: String,
    pub time_period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub analysis: String,
    pub suggestions: Vec<String>,
}

impl AdviceRequest {
    /// Reduce the full transaction set into a request.
    ///
    /// Income is totalled; every expense is listed individually, in the order
    /// given. Fails before anything is sent when goals are too short, when
    /// there is no income, or when there are no expenses.
    pub fn from_transactions(
        transactions: &[Transaction],
        goals: &str,
        time_period: &str,
    ) -> Result<Self, AdviceError> {
        let goals = goals.trim();
        let got = goals.chars().count();
        if got < MIN_GOALS_CHARS {
            return Err(AdviceError::GoalsTooShort {
                min: MIN_GOALS_CHARS,
                got,
            });
        }

        let income: f64 = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .sum();

        let expenses: Vec<ExpenseEntry> = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| ExpenseEntry {
                category: t.category.clone(),
                amount: t.amount,
            })
            .collect();

        if income <= 0.0 || expenses.is_empty() {
            return Err(AdviceError::InsufficientData);
        }

        Ok(Self {
            income,
            expenses,
            goals: goals.to_string(),
            time_period: time_period.to_string(),
        })
    }
}
