//! Dashboard aggregation: totals and per-category expense breakdown over a
//! date window.
//!
//! Pure functions over a borrowed slice. Nothing is cached; callers recompute
//! on every read.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::transaction::{Transaction, TransactionKind};
use crate::window::DateWindow;

/// One bar of the expense chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    /// Expense categories with at least one transaction in the window.
    pub category_breakdown: HashMap<String, f64>,
    /// Number of transactions that fell inside the window.
    pub transaction_count: usize,
}

impl DashboardSummary {
    /// False when the window matched nothing; render a "no data" state.
    pub fn has_data(&self) -> bool {
        self.transaction_count > 0
    }

    /// `(category, total)` pairs for charting. Order is not meaningful.
    pub fn chart_data(&self) -> Vec<CategoryTotal> {
        self.category_breakdown
            .iter()
            .map(|(category, total)| CategoryTotal {
                category: category.clone(),
                total: *total,
            })
            .collect()
    }

    /// How many expense categories had spending in the window.
    pub fn category_count(&self) -> usize {
        self.category_breakdown.len()
    }
}

/// Reduce `transactions` to dashboard metrics for `window`.
pub fn summarize(transactions: &[Transaction], window: &DateWindow) -> DashboardSummary {
    let mut summary = DashboardSummary::default();

    for t in transactions.iter().filter(|t| window.contains(t.date)) {
        summary.transaction_count += 1;
        match t.kind {
            TransactionKind::Income => summary.total_income += t.amount,
            TransactionKind::Expense => {
                summary.total_expenses += t.amount;
                *summary
                    .category_breakdown
                    .entry(t.category.clone())
                    .or_insert(0.0) += t.amount;
            }
        }
    }

    summary.balance = summary.total_income - summary.total_expenses;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{NewTransaction, TransactionId};
    use chrono::NaiveDate;

    fn tx(kind: TransactionKind, amount: f64, category: &str, y: i32, m: u32, d: u32) -> Transaction {
        NewTransaction::new(kind, amount, category, NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .with_id(TransactionId::generate())
    }

    fn may_2024() -> DateWindow {
        DateWindow::month(2024, 5).unwrap()
    }

    #[test]
    fn test_may_scenario() {
        let txns = vec![
            tx(TransactionKind::Income, 5000.0, "Salário", 2024, 5, 5),
            tx(TransactionKind::Expense, 800.0, "Moradia", 2024, 5, 10),
            tx(TransactionKind::Expense, 350.0, "Alimentação", 2024, 5, 12),
        ];

        let s = summarize(&txns, &may_2024());
        assert_eq!(s.total_income, 5000.0);
        assert_eq!(s.total_expenses, 1150.0);
        assert_eq!(s.balance, 3850.0);
        assert_eq!(s.category_breakdown.len(), 2);
        assert_eq!(s.category_breakdown["Moradia"], 800.0);
        assert_eq!(s.category_breakdown["Alimentação"], 350.0);
        assert!(!s.category_breakdown.contains_key("Salário"));
    }

    #[test]
    fn test_filters_outside_window() {
        let txns = vec![
            tx(TransactionKind::Expense, 100.0, "Lazer", 2024, 4, 30),
            tx(TransactionKind::Expense, 40.0, "Lazer", 2024, 5, 31),
            tx(TransactionKind::Income, 10.0, "Vendas", 2024, 6, 1),
        ];

        let s = summarize(&txns, &may_2024());
        assert_eq!(s.transaction_count, 1);
        assert_eq!(s.total_expenses, 40.0);
        assert_eq!(s.total_income, 0.0);
        assert_eq!(s.balance, -40.0);
    }

    #[test]
    fn test_groups_same_category() {
        let txns = vec![
            tx(TransactionKind::Expense, 120.0, "Transporte", 2024, 5, 15),
            tx(TransactionKind::Expense, 30.5, "Transporte", 2024, 5, 16),
        ];
        let s = summarize(&txns, &may_2024());
        assert_eq!(s.category_count(), 1);
        assert_eq!(s.chart_data(), vec![CategoryTotal {
            category: "Transporte".to_string(),
            total: 150.5,
        }]);
    }

    #[test]
    fn test_empty_window_is_no_data() {
        let txns = vec![tx(TransactionKind::Income, 5000.0, "Salário", 2024, 5, 5)];
        let s = summarize(&txns, &DateWindow::month(2023, 1).unwrap());
        assert!(!s.has_data());
        assert_eq!(s.total_income, 0.0);
        assert_eq!(s.total_expenses, 0.0);
        assert_eq!(s.balance, 0.0);
        assert!(s.category_breakdown.is_empty());
        assert!(s.chart_data().is_empty());
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let txns = vec![
            tx(TransactionKind::Income, 750.0, "Freelancer", 2024, 5, 22),
            tx(TransactionKind::Expense, 200.0, "Lazer", 2024, 5, 20),
        ];
        let snapshot = txns.clone();
        let a = summarize(&txns, &may_2024());
        let b = summarize(&txns, &may_2024());
        assert_eq!(a, b);
        assert_eq!(txns, snapshot);
    }
}
