use chrono::{Datelike, Local, NaiveDate};

use super::model::Dataset;

/// Job titles offered by the title selector.
pub const JOB_TITLES: [&str; 3] = ["Data Analyst", "Data Engineer", "Data Scientist"];

// ---------------------------------------------------------------------------
// Filter predicate: which postings the dashboard is looking at
// ---------------------------------------------------------------------------

/// The user's current filter choices.
///
/// `end == None` means the range is open and runs up to today, which is what
/// the date picker produces while only a start date has been chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    /// Province; `None` disables the location predicate.
    pub location: Option<String>,
    pub title: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31),
            location: None,
            title: JOB_TITLES[0].to_string(),
        }
    }
}

impl FilterSelection {
    /// Inclusive date bounds, with a missing end repaired to `today`.
    pub fn date_bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (self.start, self.end.unwrap_or(today))
    }
}

/// Return indices of postings that pass every active predicate, evaluated
/// against the local calendar date.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    filtered_indices_at(dataset, selection, Local::now().date_naive())
}

/// Same as [`filtered_indices`] with an explicit "today".
///
/// A posting passes when:
/// * `start <= date <= end` (end defaults to `today`)
/// * the location filter is off, or `locations` equals it
/// * `title` equals the selected title
pub fn filtered_indices_at(
    dataset: &Dataset,
    selection: &FilterSelection,
    today: NaiveDate,
) -> Vec<usize> {
    let (start, end) = selection.date_bounds(today);
    let indices: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            rec.date >= start
                && rec.date <= end
                && selection
                    .location
                    .as_deref()
                    .map_or(true, |loc| rec.locations == loc)
                && rec.title == selection.title
        })
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Filter {start}..={end} location={:?} title={:?}: {} of {} postings",
        selection.location,
        selection.title,
        indices.len(),
        dataset.len()
    );
    indices
}

/// Narrow already-filtered indices to postings where any field contains
/// `term`, ignoring case. A blank term keeps everything.
pub fn search_indices(dataset: &Dataset, indices: &[usize], term: &str) -> Vec<usize> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return indices.to_vec();
    }
    indices
        .iter()
        .copied()
        .filter(|&i| {
            dataset.records.get(i).is_some_and(|rec| {
                rec.searchable_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// First and last day of the calendar quarter preceding the one that
/// contains `date`. Dates in Q1 map to Q4 of the previous year.
pub fn previous_quarter(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let quarter = date.month0() / 3;
    let (year, start_month) = if quarter == 0 {
        (date.year() - 1, 10)
    } else {
        (date.year(), (quarter - 1) * 3 + 1)
    };
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).unwrap_or(date);
    let end = last_day_of_month(year, start_month + 2).unwrap_or(date);
    (start, end)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record("2023-12-31", "Data Analyst", "Quebec"),
            record("2024-01-01", "Data Analyst", "Quebec"),
            record("2024-03-10", "Data Analyst", "Ontario"),
            record("2024-06-30", "Data Scientist", "Quebec"),
            record("2024-12-31", "Data Analyst", "Quebec"),
            record("2025-02-01", "Data Analyst", "Quebec"),
        ])
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = sample();
        let sel = FilterSelection {
            location: Some("Quebec".into()),
            ..FilterSelection::default()
        };
        assert_eq!(filtered_indices_at(&ds, &sel, ymd(2026, 1, 1)), vec![1, 4]);
    }

    #[test]
    fn location_filter_is_optional() {
        let ds = sample();
        let sel = FilterSelection::default();
        assert_eq!(filtered_indices_at(&ds, &sel, ymd(2026, 1, 1)), vec![1, 2, 4]);
    }

    #[test]
    fn open_range_runs_to_today() {
        let ds = sample();
        let sel = FilterSelection {
            end: None,
            ..FilterSelection::default()
        };
        assert_eq!(filtered_indices_at(&ds, &sel, ymd(2024, 12, 31)), vec![1, 2, 4]);
        assert_eq!(filtered_indices_at(&ds, &sel, ymd(2025, 6, 1)), vec![1, 2, 4, 5]);
    }

    #[test]
    fn result_is_a_subset_satisfying_all_predicates() {
        let ds = sample();
        let sel = FilterSelection {
            start: ymd(2024, 1, 1),
            end: Some(ymd(2024, 6, 30)),
            location: Some("Quebec".into()),
            title: "Data Scientist".into(),
        };
        let idx = filtered_indices_at(&ds, &sel, ymd(2026, 1, 1));
        assert_eq!(idx, vec![3]);
        for rec in ds.select(&idx) {
            assert!(rec.date >= sel.start && rec.date <= sel.end.unwrap());
            assert_eq!(rec.locations, "Quebec");
            assert_eq!(rec.title, "Data Scientist");
        }
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let ds = sample();
        let sel = FilterSelection {
            start: ymd(2024, 12, 31),
            end: Some(ymd(2024, 1, 1)),
            ..FilterSelection::default()
        };
        assert!(filtered_indices_at(&ds, &sel, ymd(2026, 1, 1)).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut records = vec![
            record("2024-01-01", "Data Analyst", "Quebec"),
            record("2024-01-02", "Data Analyst", "Ontario"),
        ];
        records[0].sectors = Some("Finance, IT".into());
        records[1].link = "https://jobs.example.com/42".into();
        let ds = Dataset::from_records(records);

        assert_eq!(search_indices(&ds, &[0, 1], "finance"), vec![0]);
        assert_eq!(search_indices(&ds, &[0, 1], "EXAMPLE.com"), vec![1]);
        assert_eq!(search_indices(&ds, &[0, 1], "analyst"), vec![0, 1]);
        assert_eq!(search_indices(&ds, &[1], "quebec"), Vec::<usize>::new());
        assert_eq!(search_indices(&ds, &[0, 1], "   "), vec![0, 1]);
    }

    #[test]
    fn previous_quarter_wraps_year() {
        assert_eq!(
            previous_quarter(ymd(2024, 2, 10)),
            (ymd(2023, 10, 1), ymd(2023, 12, 31))
        );
        assert_eq!(
            previous_quarter(ymd(2024, 8, 15)),
            (ymd(2024, 4, 1), ymd(2024, 6, 30))
        );
        assert_eq!(
            previous_quarter(ymd(2024, 4, 1)),
            (ymd(2024, 1, 1), ymd(2024, 3, 31))
        );
    }
}
