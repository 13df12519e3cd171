use std::collections::{BTreeMap, HashSet};

use super::model::{split_multi, Column, JobRecord};

// ---------------------------------------------------------------------------
// ChartData – either something to draw or "no data"
// ---------------------------------------------------------------------------

/// Result of an aggregation feeding a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData<T> {
    Ready(T),
    /// The source column had nothing to count.
    NoData,
}

impl<T> ChartData<T> {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartData::NoData)
    }
}

/// One slice of a pie or one bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// How many categories a bar chart keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopN {
    All,
    Count(usize),
}

// ---------------------------------------------------------------------------
// Category counts
// ---------------------------------------------------------------------------

/// Count occurrences of every category in a multi-valued column.
///
/// Each cell is split on `", "` and every piece counts once. Missing cells
/// are skipped. Output is sorted by descending count, then by label.
pub fn category_counts<'a, I>(records: I, column: Column, top: TopN) -> ChartData<Vec<CategoryCount>>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    count_by(records, column, top, |value, counts| {
        for piece in split_multi(value) {
            *counts.entry(piece.to_string()).or_insert(0) += 1;
        }
    })
}

/// Count whole cell values without splitting them.
pub fn value_counts<'a, I>(records: I, column: Column, top: TopN) -> ChartData<Vec<CategoryCount>>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    count_by(records, column, top, |value, counts| {
        let value = value.trim();
        if !value.is_empty() {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
    })
}

fn count_by<'a, I, F>(records: I, column: Column, top: TopN, mut tally: F) -> ChartData<Vec<CategoryCount>>
where
    I: IntoIterator<Item = &'a JobRecord>,
    F: FnMut(&str, &mut BTreeMap<String, usize>),
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in records.into_iter().filter_map(|rec| rec.text(column)) {
        tally(value, &mut counts);
    }
    if counts.is_empty() {
        log::debug!("No values to count in column '{column}'");
        return ChartData::NoData;
    }

    // BTreeMap iterates by label, and the sort is stable, so equal counts
    // stay in label order.
    let mut sorted: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));

    if let TopN::Count(n) = top {
        sorted.truncate(n);
    }
    ChartData::Ready(sorted)
}

/// Number of postings per province, keyed by province name.
pub fn province_totals<'a, I>(records: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    let mut totals = BTreeMap::new();
    for rec in records {
        *totals.entry(rec.locations.clone()).or_insert(0) += 1;
    }
    totals
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline numbers for the filtered postings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kpis {
    /// Sum of `num_jobs`, shown as "Demand Increase".
    pub demand: i64,
    /// Distinct companies.
    pub companies: usize,
    /// Sum of `num_jobs`.
    pub jobs: i64,
    pub min_salary: f64,
    pub max_salary: f64,
}

impl Kpis {
    /// Compute the KPIs. Salary bounds ignore missing salaries and fall
    /// back to zero when there is nothing to compare.
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a JobRecord>,
    {
        let mut jobs = 0_i64;
        let mut companies: HashSet<&str> = HashSet::new();
        let mut salary: Option<(f64, f64)> = None;

        for rec in records {
            jobs += rec.num_jobs;
            if !rec.company.is_empty() {
                companies.insert(rec.company.as_str());
            }
            if let Some(s) = rec.salary {
                salary = Some(match salary {
                    Some((lo, hi)) => (lo.min(s), hi.max(s)),
                    None => (s, s),
                });
            }
        }

        let (min_salary, max_salary) = salary.unwrap_or((0.0, 0.0));
        Kpis {
            demand: jobs,
            companies: companies.len(),
            jobs,
            min_salary,
            max_salary,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::fixtures::record;

    fn with_skills(values: &[Option<&str>]) -> Vec<JobRecord> {
        values
            .iter()
            .map(|v| {
                let mut rec = record("2024-01-01", "Data Analyst", "Quebec");
                rec.skills = v.map(str::to_string);
                rec
            })
            .collect()
    }

    fn cc(category: &str, count: usize) -> CategoryCount {
        CategoryCount {
            category: category.to_string(),
            count,
        }
    }

    #[test]
    fn splits_multi_valued_cells() {
        let recs = with_skills(&[Some("Python, SQL"), Some("SQL"), None, Some("Spark, SQL")]);
        let counts = category_counts(&recs, Column::Skills, TopN::All);
        assert_eq!(
            counts,
            ChartData::Ready(vec![cc("SQL", 3), cc("Python", 1), cc("Spark", 1)])
        );
    }

    #[test]
    fn counts_sum_to_number_of_pieces() {
        let cells = [Some("a, b, c"), Some("b"), None, Some("c, c"), Some("")];
        let recs = with_skills(&cells);
        let pieces: usize = cells
            .iter()
            .flatten()
            .map(|v| split_multi(v).count())
            .sum();
        let ChartData::Ready(counts) = category_counts(&recs, Column::Skills, TopN::All) else {
            panic!("expected counts");
        };
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), pieces);
        assert_eq!(pieces, 6);
    }

    #[test]
    fn all_null_column_is_no_data() {
        let recs = with_skills(&[None, None]);
        assert!(category_counts(&recs, Column::Skills, TopN::All).is_no_data());
        assert!(value_counts(&recs, Column::Skills, TopN::All).is_no_data());
    }

    #[test]
    fn blank_pieces_only_is_no_data() {
        let recs = with_skills(&[Some(", "), Some(" ")]);
        assert!(category_counts(&recs, Column::Skills, TopN::All).is_no_data());
    }

    #[test]
    fn empty_table_is_no_data() {
        let recs: Vec<JobRecord> = Vec::new();
        assert!(category_counts(&recs, Column::Language, TopN::All).is_no_data());
    }

    #[test]
    fn top_n_keeps_highest_counts() {
        // h x1, g x2, ... a x8
        let mut cells = Vec::new();
        for (i, name) in ["a", "b", "c", "d", "e", "f", "g", "h"].iter().enumerate() {
            for _ in 0..(8 - i) {
                cells.push(Some(*name));
            }
        }
        let recs = with_skills(&cells);
        let ChartData::Ready(top) = category_counts(&recs, Column::Skills, TopN::Count(5)) else {
            panic!("expected counts");
        };
        let labels: Vec<&str> = top.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn ties_break_on_label() {
        let recs = with_skills(&[Some("Spark"), Some("Python"), Some("SQL, Python, Spark")]);
        let counts = category_counts(&recs, Column::Skills, TopN::Count(2));
        assert_eq!(
            counts,
            ChartData::Ready(vec![cc("Python", 2), cc("Spark", 2)])
        );
    }

    #[test]
    fn value_counts_keeps_whole_cells() {
        let mut recs = with_skills(&[None, None, None]);
        recs[0].sectors = Some("Finance, IT".into());
        recs[1].sectors = Some("Finance, IT".into());
        recs[2].sectors = Some("IT".into());
        assert_eq!(
            value_counts(&recs, Column::Sectors, TopN::All),
            ChartData::Ready(vec![cc("Finance, IT", 2), cc("IT", 1)])
        );
    }

    #[test]
    fn province_totals_counts_rows() {
        let recs = vec![
            record("2024-01-01", "Data Analyst", "Quebec"),
            record("2024-01-02", "Data Analyst", "Ontario"),
            record("2024-01-03", "Data Analyst", "Quebec"),
        ];
        let totals = province_totals(&recs);
        assert_eq!(totals.get("Quebec"), Some(&2));
        assert_eq!(totals.get("Ontario"), Some(&1));
    }

    #[test]
    fn kpis_default_to_zero_on_empty_input() {
        let recs: Vec<JobRecord> = Vec::new();
        let kpis = Kpis::compute(&recs);
        assert_eq!(kpis, Kpis::default());
        assert_eq!(kpis.min_salary, 0.0);
        assert_eq!(kpis.max_salary, 0.0);
    }

    #[test]
    fn kpis_skip_missing_salaries() {
        let mut recs = vec![
            record("2024-01-01", "Data Analyst", "Quebec"),
            record("2024-01-02", "Data Analyst", "Quebec"),
            record("2024-01-03", "Data Analyst", "Quebec"),
        ];
        recs[0].salary = Some(90_000.0);
        recs[0].company = "Acme".into();
        recs[0].num_jobs = 3;
        recs[1].salary = Some(150_000.0);
        recs[1].company = "Acme".into();
        recs[2].company = "Globex".into();

        let kpis = Kpis::compute(&recs);
        assert_eq!(kpis.jobs, 5);
        assert_eq!(kpis.demand, 5);
        assert_eq!(kpis.companies, 2);
        assert_eq!((kpis.min_salary, kpis.max_salary), (90_000.0, 150_000.0));
    }
}
