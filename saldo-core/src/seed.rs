//! Demo data: one month of a typical household.

use chrono::NaiveDate;

use crate::transaction::{NewTransaction, Transaction, TransactionId, TransactionKind};

fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap_or(NaiveDate::MIN)
}

/// Six sample transactions from May 2024, with fresh ids.
pub fn demo_transactions() -> Vec<Transaction> {
    use TransactionKind::{Expense, Income};

    [
        NewTransaction::new(Income, 5000.0, "Salário", may(5))
            .recurring(true)
            .with_notes("Salário mensal"),
        NewTransaction::new(Expense, 800.0, "Moradia", may(10))
            .recurring(true)
            .with_notes("Aluguel"),
        NewTransaction::new(Expense, 350.0, "Alimentação", may(12))
            .with_notes("Compras no supermercado"),
        NewTransaction::new(Expense, 120.0, "Transporte", may(15)).with_notes("Gasolina"),
        NewTransaction::new(Expense, 200.0, "Lazer", may(20)).with_notes("Cinema e jantar"),
        NewTransaction::new(Income, 750.0, "Freelancer", may(22)).with_notes("Projeto de design"),
    ]
    .into_iter()
    .map(|t| t.with_id(TransactionId::generate()))
    .collect()
}
