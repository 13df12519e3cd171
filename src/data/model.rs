use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::error::LoadError;

/// Separator used by every multi-valued text column.
pub const MULTI_VALUE_SEPARATOR: &str = ", ";

// ---------------------------------------------------------------------------
// CellValue – a single raw cell as read from disk
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, the common currency of the JSON, CSV and
/// Parquet loaders before a row is turned into a [`JobRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the cell. Numeric strings are accepted since CSV
    /// exports often quote everything.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_nan() => None,
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok().filter(|v| !v.is_nan()),
            _ => None,
        }
    }

    /// Text view of the cell; `None` for nulls and empty strings.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) if s.is_empty() => None,
            CellValue::Float(v) if v.is_nan() => None,
            other => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – the categorical text columns of a job posting
// ---------------------------------------------------------------------------

/// Categorical text columns that charts can aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Locations,
    Company,
    Sectors,
    Skills,
    SoftSkills,
    Language,
    EducationLevel,
    WorkMode,
    /// Cities with the most postings over the last quarter.
    City,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Title,
        Column::Locations,
        Column::Company,
        Column::Sectors,
        Column::Skills,
        Column::SoftSkills,
        Column::Language,
        Column::EducationLevel,
        Column::WorkMode,
        Column::City,
    ];

    /// Field name in the on-disk dataset.
    pub const fn field_name(self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::Locations => "locations",
            Column::Company => "company",
            Column::Sectors => "sectors",
            Column::Skills => "skills",
            Column::SoftSkills => "soft_skills",
            Column::Language => "language",
            Column::EducationLevel => "education_level",
            Column::WorkMode => "work_mode",
            Column::City => "ville_offre_last_Q",
        }
    }

    /// Human-readable axis label.
    pub const fn label(self) -> &'static str {
        match self {
            Column::Title => "Job title",
            Column::Locations => "Province",
            Column::Company => "Company",
            Column::Sectors => "Sector",
            Column::Skills => "Skill",
            Column::SoftSkills => "Soft skill",
            Column::Language => "Language",
            Column::EducationLevel => "Education level",
            Column::WorkMode => "Work mode",
            Column::City => "City",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Split a multi-valued cell on [`MULTI_VALUE_SEPARATOR`], trimming pieces
/// and dropping empty ones.
pub fn split_multi(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(MULTI_VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
}

// ---------------------------------------------------------------------------
// JobRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// Field names a posting is read from.
pub const RECORD_FIELDS: [&str; 14] = [
    "date",
    "title",
    "locations",
    "salary",
    "num_jobs",
    "company",
    "sectors",
    "skills",
    "soft_skills",
    "language",
    "education_level",
    "work_mode",
    "ville_offre_last_Q",
    "link",
];

/// A single job posting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub date: NaiveDate,
    pub title: String,
    pub locations: String,
    pub salary: Option<f64>,
    pub num_jobs: i64,
    pub company: String,
    pub sectors: Option<String>,
    pub skills: Option<String>,
    pub soft_skills: Option<String>,
    pub language: Option<String>,
    pub education_level: Option<String>,
    pub work_mode: Option<String>,
    #[serde(rename = "ville_offre_last_Q")]
    pub city: Option<String>,
    pub link: String,
}

impl JobRecord {
    /// Value of a categorical column; `None` when the cell is missing or empty.
    pub fn text(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::Title => Some(self.title.as_str()),
            Column::Locations => Some(self.locations.as_str()),
            Column::Company => Some(self.company.as_str()),
            Column::Sectors => self.sectors.as_deref(),
            Column::Skills => self.skills.as_deref(),
            Column::SoftSkills => self.soft_skills.as_deref(),
            Column::Language => self.language.as_deref(),
            Column::EducationLevel => self.education_level.as_deref(),
            Column::WorkMode => self.work_mode.as_deref(),
            Column::City => self.city.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Every field rendered as text, used by the listings search box.
    pub fn searchable_fields(&self) -> Vec<String> {
        let mut fields = vec![self.date.to_string(), self.num_jobs.to_string(), self.link.clone()];
        if let Some(salary) = self.salary {
            fields.push(salary.to_string());
        }
        fields.extend(
            Column::ALL
                .iter()
                .filter_map(|&col| self.text(col))
                .map(str::to_string),
        );
        fields
    }

    /// Build a record from a row of raw cells keyed by field name.
    ///
    /// Only `date` is required. A row without a title or province is kept
    /// with an empty value and never matches those filters.
    pub fn from_cells(row: usize, cells: &BTreeMap<String, CellValue>) -> Result<Self, LoadError> {
        let text = |field: &str| cells.get(field).and_then(CellValue::as_text);
        let lenient = |field: &str| {
            text(field).unwrap_or_else(|| {
                log::warn!("row {row}: '{field}' is missing, keeping the posting without it");
                String::new()
            })
        };

        let date_cell = cells
            .get("date")
            .filter(|c| !c.is_null())
            .ok_or(LoadError::MissingField { row, field: "date" })?;
        let date = parse_date(date_cell).ok_or_else(|| LoadError::InvalidDate {
            row,
            value: date_cell.to_string(),
        })?;

        let num_jobs = match cells.get("num_jobs") {
            None | Some(CellValue::Null) => 0,
            Some(cell) => cell.as_f64().map(|v| v as i64).ok_or(LoadError::InvalidField {
                row,
                field: "num_jobs",
                expected: "an integer",
            })?,
        };

        Ok(JobRecord {
            date,
            title: lenient("title"),
            locations: lenient("locations"),
            salary: cells.get("salary").and_then(CellValue::as_f64),
            num_jobs,
            company: text("company").unwrap_or_default(),
            sectors: text("sectors"),
            skills: text("skills"),
            soft_skills: text("soft_skills"),
            language: text("language"),
            education_level: text("education_level"),
            work_mode: text("work_mode"),
            city: text("ville_offre_last_Q"),
            link: text("link").unwrap_or_default(),
        })
    }
}

/// Interpret a raw cell as a calendar date.
///
/// Accepts ISO dates, ISO date-times (with or without offset) and integer
/// epoch milliseconds, which is what `DataFrame.to_json` writes by default.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Integer(ms) => chrono::DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
        CellValue::Float(ms) => {
            chrono::DateTime::from_timestamp_millis(*ms as i64).map(|dt| dt.date_naive())
        }
        CellValue::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter choices.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All postings, in file order.
    pub records: Vec<JobRecord>,
    /// Sorted unique non-empty provinces.
    pub locations: Vec<String>,
    /// Sorted unique non-empty job titles.
    pub titles: Vec<String>,
}

impl Dataset {
    /// Build the filter choices from the loaded records.
    pub fn from_records(records: Vec<JobRecord>) -> Self {
        let choices = |field: fn(&JobRecord) -> &str| -> Vec<String> {
            let unique: BTreeSet<&str> = records
                .iter()
                .map(field)
                .filter(|v| !v.is_empty())
                .collect();
            unique.into_iter().map(str::to_string).collect()
        };
        let locations = choices(|r| r.locations.as_str());
        let titles = choices(|r| r.title.as_str());
        Dataset {
            records,
            locations,
            titles,
        }
    }

    /// First non-empty province in file order.
    pub fn first_location(&self) -> Option<&str> {
        self.records
            .iter()
            .map(|r| r.locations.as_str())
            .find(|l| !l.is_empty())
    }

    /// Number of postings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records at the given indices, in index order.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a JobRecord> + 'a {
        indices.iter().filter_map(|&i| self.records.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::record;

    fn cells(pairs: &[(&str, CellValue)]) -> BTreeMap<String, CellValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn split_multi_drops_empty_pieces() {
        let pieces: Vec<&str> = split_multi("Python, SQL, , Spark").collect();
        assert_eq!(pieces, vec!["Python", "SQL", "Spark"]);
        assert_eq!(split_multi("").count(), 0);
    }

    #[test]
    fn parse_date_accepts_common_encodings() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date(&CellValue::String("2024-03-15".into())), Some(expected));
        assert_eq!(
            parse_date(&CellValue::String("2024-03-15T10:20:30".into())),
            Some(expected)
        );
        assert_eq!(
            parse_date(&CellValue::String("2024-03-15 10:20:30.250".into())),
            Some(expected)
        );
        // 2024-03-15T00:00:00Z in epoch milliseconds
        assert_eq!(parse_date(&CellValue::Integer(1_710_460_800_000)), Some(expected));
        assert_eq!(parse_date(&CellValue::String("15/03/2024".into())), None);
    }

    #[test]
    fn from_cells_fills_optional_fields() {
        let row = cells(&[
            ("date", CellValue::String("2024-01-05".into())),
            ("title", CellValue::String("Data Analyst".into())),
            ("locations", CellValue::String("Quebec".into())),
            ("salary", CellValue::Null),
            ("skills", CellValue::String(String::new())),
        ]);
        let rec = JobRecord::from_cells(0, &row).unwrap();
        assert_eq!(rec.salary, None);
        assert_eq!(rec.num_jobs, 0);
        assert_eq!(rec.skills, None);
        assert_eq!(rec.text(Column::Skills), None);
        assert_eq!(rec.text(Column::Locations), Some("Quebec"));
    }

    #[test]
    fn from_cells_keeps_rows_without_title_or_province() {
        let row = cells(&[
            ("date", CellValue::String("2024-01-05".into())),
            ("locations", CellValue::Null),
        ]);
        let rec = JobRecord::from_cells(7, &row).unwrap();
        assert_eq!(rec.title, "");
        assert_eq!(rec.locations, "");
        assert_eq!(rec.text(Column::Locations), None);
    }

    #[test]
    fn from_cells_requires_a_date() {
        let row = cells(&[("title", CellValue::String("Data Analyst".into()))]);
        let err = JobRecord::from_cells(7, &row).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { row: 7, field: "date" }));
    }

    #[test]
    fn dataset_collects_sorted_choices() {
        let mk = |title: &str, loc: &str| record("2024-01-01", title, loc);
        let ds = Dataset::from_records(vec![
            mk("Data Scientist", "Ontario"),
            mk("Data Analyst", "Alberta"),
            mk("Data Analyst", "Ontario"),
        ]);
        assert_eq!(ds.locations, vec!["Alberta", "Ontario"]);
        assert_eq!(ds.titles, vec!["Data Analyst", "Data Scientist"]);
        assert_eq!(ds.select(&[2, 0]).count(), 2);
    }

    #[test]
    fn blank_values_are_not_offered_as_choices() {
        let ds = Dataset::from_records(vec![
            record("2024-01-01", "", ""),
            record("2024-01-02", "Data Analyst", "Quebec"),
            record("2024-01-03", "Data Analyst", "Alberta"),
        ]);
        assert_eq!(ds.locations, vec!["Alberta", "Quebec"]);
        assert_eq!(ds.titles, vec!["Data Analyst"]);
        assert_eq!(ds.first_location(), Some("Quebec"));
    }
}
