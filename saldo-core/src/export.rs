//! One-way CSV export of the transaction list.
//!
//! Columns, in order: id, type, amount, category, date (yyyy-MM-dd),
//! recurring flag, notes (empty when absent).

use anyhow::{Context, Result};
use std::io::Write;

use crate::transaction::Transaction;
use crate::validation::DATE_FORMAT;

pub const CSV_HEADER: [&str; 7] = ["id", "type", "amount", "category", "date", "recurring", "notes"];

/// Write `transactions` as CSV, header first, in the given order.
pub fn export_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER).context("writing csv header")?;

    for t in transactions {
        // f64 Display gives the shortest form: 5000, 350.5
        let amount = t.amount.to_string();
        let date = t.date.format(DATE_FORMAT).to_string();
        let recurring = if t.is_recurring { "true" } else { "false" };
        wtr.write_record([
            t.id.as_str(),
            t.kind.as_str(),
            amount.as_str(),
            t.category.as_str(),
            date.as_str(),
            recurring,
            t.notes.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("writing csv row for {}", t.id))?;
    }

    wtr.flush().context("flushing csv output")?;
    Ok(())
}

/// Same as [`export_csv`], collected into a String.
pub fn export_csv_string(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    export_csv(transactions, &mut buf)?;
    String::from_utf8(buf).context("csv output was not utf-8")
}
