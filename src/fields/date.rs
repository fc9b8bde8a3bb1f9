//! Relative date labels ("3 weeks ago").

use chrono::{Days, NaiveDate};

use crate::patterns::LEADING_NUMBER;

/// Unit keyword of a relative date. Months and years are approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DateUnit {
    /// Keyword checks run in this order; the first hit wins.
    const ORDER: [(Self, &'static str); 4] = [
        (Self::Day, "day"),
        (Self::Week, "week"),
        (Self::Month, "month"),
        (Self::Year, "year"),
    ];

    #[must_use]
    pub fn days(self) -> u64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    /// First unit keyword found in `label`, case-insensitively.
    #[must_use]
    pub fn find(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        Self::ORDER
            .iter()
            .find(|(_, keyword)| lower.contains(keyword))
            .map(|(unit, _)| *unit)
    }
}

/// Turn a relative label into an absolute date counted back from `today`.
///
/// Labels without a number ("a week ago", "today") or without a unit keyword
/// return `None`.
#[must_use]
pub fn parse_relative_date(label: &str, today: NaiveDate) -> Option<NaiveDate> {
    let amount: u64 = LEADING_NUMBER.find(label)?.as_str().parse().ok()?;
    let unit = DateUnit::find(label)?;
    today.checked_sub_days(Days::new(amount.checked_mul(unit.days())?))
}
