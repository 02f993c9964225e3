//! Plain-text rendering for the terminal. Display formatting lives here,
//! never in the core.

use saldo_core::{DashboardSummary, DateWindow, Transaction};
use std::fmt::Write as _;

pub fn money(value: f64) -> String {
    if value < 0.0 {
        format!("-R$ {:.2}", value.abs())
    } else {
        format!("R$ {:.2}", value)
    }
}

pub fn dashboard(summary: &DashboardSummary, window: &DateWindow) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# Dashboard {} .. {}\n", window.from(), window.to());
    let _ = writeln!(s, "Balance:   {}", money(summary.balance));
    let _ = writeln!(s, "Income:    {}", money(summary.total_income));
    let _ = writeln!(s, "Expenses:  {}", money(summary.total_expenses));
    let _ = writeln!(s, "Categories with spending: {}\n", summary.category_count());

    if !summary.has_data() {
        s.push_str("No transactions in this period.\n");
        return s;
    }
    if summary.category_count() == 0 {
        s.push_str("No expenses to chart in this period.\n");
        return s;
    }

    let mut bars = summary.chart_data();
    bars.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    let width = bars.iter().map(|b| b.category.chars().count()).max().unwrap_or(0);
    for b in bars {
        let share = if summary.total_expenses > 0.0 {
            b.total / summary.total_expenses
        } else {
            0.0
        };
        let bar = "#".repeat((share * 30.0).round() as usize);
        let pad = width - b.category.chars().count();
        let _ = writeln!(
            s,
            "{}{} {:>12} {}",
            b.category,
            " ".repeat(pad),
            money(b.total),
            bar
        );
    }
    s
}

pub fn transaction_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions recorded.\n".to_string();
    }
    let mut s = String::new();
    for t in transactions {
        let _ = writeln!(
            s,
            "{}  {}  {:<7}  {:>12}  {}{}{}",
            t.id,
            t.date.format("%d/%m/%Y"),
            t.kind.as_str(),
            money(t.amount),
            t.category,
            if t.is_recurring { " (recurring)" } else { "" },
            t.notes.as_deref().map(|n| format!(" - {n}")).unwrap_or_default(),
        );
    }
    s
}
