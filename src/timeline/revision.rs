//! Revision windows leading up to each assessment year

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

/// An inclusive date range for revising a year's modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevisionPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RevisionPeriod {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Synthesize one revision period per year.
///
/// `years_ascending` holds the distinct years present, sorted ascending.
/// Every period ends on January 31 of its year. The earliest year starts
/// `today`; later years start on February 1 of the preceding year in the
/// list. Years whose start would fall after their end get no period.
pub fn synthesize(years_ascending: &[i32], today: NaiveDate) -> BTreeMap<i32, RevisionPeriod> {
    let mut periods = BTreeMap::new();

    for (index, &year) in years_ascending.iter().enumerate() {
        let Some(end) = NaiveDate::from_ymd_opt(year, 1, 31) else {
            log::warn!("No revision period for out-of-range year {}", year);
            continue;
        };

        let start = if index == 0 {
            Some(today)
        } else {
            NaiveDate::from_ymd_opt(years_ascending[index - 1], 2, 1)
        };

        match start {
            Some(start) if start <= end => {
                periods.insert(year, RevisionPeriod { start, end });
            }
            Some(start) => {
                log::debug!("Skipping revision period for {}: start {} is after {}", year, start, end);
            }
            None => {}
        }
    }

    periods
}

/// [`synthesize`] anchored on the local calendar date
pub fn synthesize_now(years_ascending: &[i32]) -> BTreeMap<i32, RevisionPeriod> {
    synthesize(years_ascending, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_periods_chain_from_previous_year() {
        let today = date(2025, 9, 1);
        let periods = synthesize(&[2026, 2027, 2028], today);

        assert_eq!(periods[&2026], RevisionPeriod { start: today, end: date(2026, 1, 31) });
        assert_eq!(periods[&2027], RevisionPeriod { start: date(2026, 2, 1), end: date(2027, 1, 31) });
        assert_eq!(periods[&2028], RevisionPeriod { start: date(2027, 2, 1), end: date(2028, 1, 31) });
    }

    #[test]
    fn test_earliest_year_in_the_past_is_skipped() {
        let today = date(2026, 10, 19);
        let periods = synthesize(&[2026, 2027, 2028], today);

        assert!(!periods.contains_key(&2026));
        assert_eq!(periods[&2027].start, date(2026, 2, 1));
        assert_eq!(periods.len(), 2);
    }

    #[test]
    fn test_boundary_day_is_kept() {
        let periods = synthesize(&[2026], date(2026, 1, 31));
        assert_eq!(periods[&2026].days(), 1);

        let periods = synthesize(&[2026], date(2026, 2, 1));
        assert!(periods.is_empty());
    }

    #[test]
    fn test_gap_years_chain_from_previous_present_year() {
        let periods = synthesize(&[2026, 2029], date(2025, 12, 1));
        assert_eq!(periods[&2029].start, date(2026, 2, 1));
        assert_eq!(periods[&2029].end, date(2029, 1, 31));
    }

    #[test]
    fn test_no_years() {
        assert!(synthesize(&[], date(2026, 1, 1)).is_empty());
    }
}
