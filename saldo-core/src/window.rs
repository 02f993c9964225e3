//! Aggregation windows: inclusive calendar date ranges.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("window start {from} is after its end {to}")]
    Inverted { from: NaiveDate, to: NaiveDate },

    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Inclusive `[from, to]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, WindowError> {
        if from > to {
            return Err(WindowError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// First through last day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let from = date.with_day(1).unwrap_or(date);
        let to = from
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { from, to }
    }

    /// Window for a calendar month given as year and 1-based month.
    pub fn month(year: i32, month: u32) -> Result<Self, WindowError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self::month_of)
            .ok_or(WindowError::InvalidMonth { year, month })
    }

    /// Every representable date.
    pub fn all_time() -> Self {
        Self {
            from: NaiveDate::MIN,
            to: NaiveDate::MAX,
        }
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        let w = DateWindow::month_of(d(2024, 2, 14));
        assert_eq!(w.from(), d(2024, 2, 1));
        assert_eq!(w.to(), d(2024, 2, 29));

        let dec = DateWindow::month(2023, 12).unwrap();
        assert_eq!(dec.to(), d(2023, 12, 31));
    }

    #[test]
    fn test_inclusive_edges() {
        let w = DateWindow::new(d(2024, 5, 1), d(2024, 5, 31)).unwrap();
        assert!(w.contains(d(2024, 5, 1)));
        assert!(w.contains(d(2024, 5, 31)));
        assert!(!w.contains(d(2024, 4, 30)));
        assert!(!w.contains(d(2024, 6, 1)));
    }

    #[test]
    fn test_single_day_and_inverted() {
        assert!(DateWindow::new(d(2024, 5, 5), d(2024, 5, 5)).is_ok());
        assert!(matches!(
            DateWindow::new(d(2024, 5, 6), d(2024, 5, 5)),
            Err(WindowError::Inverted { .. })
        ));
        assert!(DateWindow::month(2024, 13).is_err());
    }

    #[test]
    fn test_all_time() {
        let w = DateWindow::all_time();
        assert!(w.contains(d(1900, 1, 1)));
        assert!(w.contains(d(2999, 12, 31)));
    }
}
