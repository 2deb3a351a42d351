//! Calendar month values (`MM-YYYY` on the wire, first-of-month in storage).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};

use crate::errors::ModelError;

/// A year + month with no day component. Ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// `None` when `month` is outside 1..=12 or `year` outside 0..=9999.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(0..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Storage representation: the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month(), self.year())
    }
}

impl FromStr for Month {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_month(s)
    }
}

/// Parse exactly `MM-YYYY`: two digits for a month in 01..=12, a dash,
/// four digits for the year.
pub fn parse_month(input: &str) -> Result<Month, ModelError> {
    let invalid = || ModelError::Validation(format!("invalid month {input:?}: expected MM-YYYY"));

    let bytes = input.as_bytes();
    if !input.is_ascii() || bytes.len() != 7 || bytes[2] != b'-' {
        return Err(invalid());
    }
    let (mm, yyyy) = (&input[..2], &input[3..]);
    if !mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let month: u32 = mm.parse().map_err(|_| invalid())?;
    let year: i32 = yyyy.parse().map_err(|_| invalid())?;
    Month::new(year, month).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_digit_month_and_four_digit_year() {
        let m = parse_month("01-2024").unwrap();
        assert_eq!((m.year(), m.month()), (2024, 1));
        assert_eq!(m.first_day(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

        let m = parse_month("12-1999").unwrap();
        assert_eq!((m.year(), m.month()), (1999, 12));
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [
            "1-2024", "13-2024", "00-2024", "01/2024", "2024-01", "01-24", " 01-2024",
            "01-2024 ", "0a-2024", "01-20x4", "", "01--024", "+1-2024", "01-+024", "é1-2024",
        ] {
            assert!(parse_month(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn error_names_expected_format() {
        let err = parse_month("1-2024").unwrap_err();
        assert!(matches!(err, ModelError::Validation(ref m) if m.contains("MM-YYYY")));
    }

    #[test]
    fn display_round_trips() {
        let m: Month = "07-2025".parse().unwrap();
        assert_eq!(m.to_string(), "07-2025");
    }

    #[test]
    fn orders_chronologically() {
        let dec = parse_month("12-2023").unwrap();
        let jan = parse_month("01-2024").unwrap();
        let feb = parse_month("02-2024").unwrap();
        assert!(dec < jan && jan < feb);
    }

    #[test]
    fn from_date_truncates_to_first_day() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let m = Month::from_date(d);
        assert_eq!(m, parse_month("02-2024").unwrap());
        assert_eq!(m.first_day().day(), 1);
    }

    #[test]
    fn new_checks_ranges() {
        assert!(Month::new(2024, 0).is_none());
        assert!(Month::new(2024, 13).is_none());
        assert!(Month::new(10000, 1).is_none());
        assert!(Month::new(0, 1).is_some());
    }
}
