use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reporting window for a customer statement.
///
/// Calendar semantics, not rolling ones, except for `LastSixMonths`:
/// `LastMonth` is the current calendar month, `LastYear` the current
/// calendar year, and `LastSixMonths` a rolling six-calendar-month window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Period {
    All,
    LastMonth,
    LastSixMonths,
    LastYear,
    Custom,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::All => "all",
            Period::LastMonth => "month",
            Period::LastSixMonths => "six-months",
            Period::LastYear => "year",
            Period::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Period::All),
            "month" => Some(Period::LastMonth),
            "six-months" => Some(Period::LastSixMonths),
            "year" => Some(Period::LastYear),
            "custom" => Some(Period::Custom),
            _ => None,
        }
    }

    /// Whether a dated record falls inside this window, evaluated against
    /// `now`. `All` and `Custom` always hold here: `All` is the identity
    /// filter, and custom bounds are checked by the caller, which owns the
    /// from/to pair.
    pub fn contains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Period::All | Period::Custom => true,
            Period::LastMonth => {
                created_at.year() == now.year() && created_at.month() == now.month()
            }
            Period::LastSixMonths => match now.checked_sub_months(Months::new(6)) {
                Some(cutoff) => created_at >= cutoff,
                None => true,
            },
            Period::LastYear => created_at.year() == now.year(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive range for a custom window: start of the `from` day through the
/// end of the `to` day.
pub fn custom_range(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = from.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = to.and_hms_opt(23, 59, 59).unwrap().and_utc();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_period_roundtrip() {
        for period in [
            Period::All,
            Period::LastMonth,
            Period::LastSixMonths,
            Period::LastYear,
            Period::Custom,
        ] {
            assert_eq!(Period::from_str(period.as_str()), Some(period));
        }
        assert_eq!(Period::from_str("fortnight"), None);
    }

    #[test]
    fn test_last_month_is_calendar_month() {
        let now = ts("2024-03-15T12:00:00Z");
        assert!(Period::LastMonth.contains(ts("2024-03-01T00:00:00Z"), now));
        assert!(Period::LastMonth.contains(ts("2024-03-31T23:59:59Z"), now));
        assert!(!Period::LastMonth.contains(ts("2024-02-28T12:00:00Z"), now));
        // Same month of a different year does not match
        assert!(!Period::LastMonth.contains(ts("2023-03-15T12:00:00Z"), now));
    }

    #[test]
    fn test_last_six_months_is_rolling() {
        let now = ts("2024-07-15T12:00:00Z");
        assert!(Period::LastSixMonths.contains(ts("2024-01-15T12:00:00Z"), now));
        assert!(Period::LastSixMonths.contains(ts("2024-06-01T00:00:00Z"), now));
        assert!(!Period::LastSixMonths.contains(ts("2024-01-14T12:00:00Z"), now));
    }

    #[test]
    fn test_last_year_is_calendar_year() {
        let now = ts("2024-06-15T12:00:00Z");
        assert!(Period::LastYear.contains(ts("2024-01-01T00:00:00Z"), now));
        assert!(Period::LastYear.contains(ts("2024-12-31T23:59:59Z"), now));
        assert!(!Period::LastYear.contains(ts("2023-12-31T23:59:59Z"), now));
    }

    #[test]
    fn test_custom_range_covers_whole_days() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let (start, end) = custom_range(from, to);
        assert_eq!(start, ts("2024-01-10T00:00:00Z"));
        assert_eq!(end, ts("2024-01-20T23:59:59Z"));
    }
}
