use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::model::JobRecord;

/// Calendar-month bucket key. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Count postings per calendar month, ascending by month.
///
/// Only months that actually have postings appear; gaps are not filled.
pub fn monthly_counts<'a, I>(records: I) -> Vec<(YearMonth, usize)>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let mut buckets: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for rec in records {
        *buckets.entry(YearMonth::of(rec.date)).or_insert(0) += 1;
    }
    buckets.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth { year, month }
    }

    #[test]
    fn buckets_by_month_in_order() {
        let recs = vec![
            record("2024-02-01", "Data Analyst", "Quebec"),
            record("2024-01-20", "Data Analyst", "Quebec"),
            record("2024-01-05", "Data Analyst", "Quebec"),
        ];
        assert_eq!(monthly_counts(&recs), vec![(ym(2024, 1), 2), (ym(2024, 2), 1)]);
    }

    #[test]
    fn missing_months_are_not_synthesized() {
        let recs = vec![
            record("2023-11-30", "Data Analyst", "Quebec"),
            record("2024-03-01", "Data Analyst", "Quebec"),
        ];
        let months: Vec<YearMonth> = monthly_counts(&recs).into_iter().map(|(m, _)| m).collect();
        assert_eq!(months, vec![ym(2023, 11), ym(2024, 3)]);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let recs: Vec<JobRecord> = Vec::new();
        assert!(monthly_counts(&recs).is_empty());
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(ym(2024, 1).to_string(), "2024-01");
    }
}
