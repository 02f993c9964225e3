//! Parsing of date-window arguments shared by the subcommand and the shell.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use saldo_core::DateWindow;

/// `yyyy-mm` into the window covering that month.
pub fn parse_month(s: &str) -> Result<DateWindow> {
    let (y, m) = s
        .trim()
        .split_once('-')
        .with_context(|| format!("expected yyyy-mm, got '{s}'"))?;
    let year: i32 = y.parse().with_context(|| format!("invalid year in '{s}'"))?;
    let month: u32 = m.parse().with_context(|| format!("invalid month in '{s}'"))?;
    Ok(DateWindow::month(year, month)?)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("expected yyyy-mm-dd, got '{s}'"))
}

/// No args: current month. One arg: `all` or `yyyy-mm`. Two args: from, to.
pub fn parse_window_args(args: &[String]) -> Result<DateWindow> {
    match args {
        [] => Ok(DateWindow::month_of(Local::now().date_naive())),
        [one] if one == "all" => Ok(DateWindow::all_time()),
        [one] => parse_month(one),
        [from, to] => Ok(DateWindow::new(parse_date(from)?, parse_date(to)?)?),
        _ => bail!("expected: [yyyy-mm | <from> <to> | all]"),
    }
}
