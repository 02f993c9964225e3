//! Conventional category labels per transaction kind.
//!
//! The catalog is a suggestion list for input surfaces. Neither validation nor
//! the store rejects a label outside it.

use crate::transaction::TransactionKind;

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Alimentação",
    "Transporte",
    "Lazer",
    "Moradia",
    "Saúde",
    "Educação",
    "Compras",
    "Outros",
];

pub const INCOME_SOURCES: &[&str] = &["Salário", "Freelancer", "Investimentos", "Vendas", "Outros"];

/// Catalog that applies to a given kind.
pub fn catalog_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Expense => EXPENSE_CATEGORIES,
        TransactionKind::Income => INCOME_SOURCES,
    }
}

/// Exact (trimmed) membership check against the kind's catalog.
pub fn is_known_category(kind: TransactionKind, label: &str) -> bool {
    let label = label.trim();
    catalog_for(kind).iter().any(|c| *c == label)
}
