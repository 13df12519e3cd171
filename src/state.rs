use std::path::Path;

use chrono::{Local, NaiveDate};
use jobs_dashboard::data::filter::{filtered_indices, previous_quarter, FilterSelection};
use jobs_dashboard::data::loader::load_file;
use jobs_dashboard::data::model::{Dataset, JobRecord};

/// Dataset loaded at startup when present.
pub const DEFAULT_DATASET_PATH: &str = "data/job_data.json";

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Overview,
    Market,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Overview, Page::Market];

    pub fn label(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Overview => "Overview",
            Page::Market => "Market",
        }
    }

    /// The home page looks at every province at once.
    pub fn filters_by_province(self) -> bool {
        !matches!(self, Page::Home)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    pub page: Page,

    /// Current filter choices. The province is remembered even while the
    /// home page ignores it.
    pub selection: FilterSelection,

    /// Indices of postings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Free-text search over the listings table.
    pub search: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// State with the default dataset loaded if it exists on disk.
    pub fn with_default_dataset() -> Self {
        let mut state = Self::default();
        let path = Path::new(DEFAULT_DATASET_PATH);
        if path.exists() {
            state.load_from(path);
        } else {
            log::info!("No dataset at {DEFAULT_DATASET_PATH}; waiting for File → Open");
        }
        state
    }

    /// Load a file, replacing the current dataset on success. On failure
    /// the previous dataset stays and the error is shown in the top bar.
    pub fn load_from(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the province choice to the
    /// first province in file order.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection.location = dataset.first_location().map(str::to_string);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Filter selection as applied on the current page.
    pub fn effective_selection(&self) -> FilterSelection {
        let mut selection = self.selection.clone();
        if !self.page.filters_by_province() {
            selection.location = None;
        }
        selection
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        let selection = self.effective_selection();
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &selection);
        }
    }

    pub fn set_page(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.refilter();
        }
    }

    /// Set the date range to the quarter before today's.
    pub fn select_previous_quarter(&mut self) {
        self.select_previous_quarter_of(Local::now().date_naive());
    }

    pub fn select_previous_quarter_of(&mut self, date: NaiveDate) {
        let (start, end) = previous_quarter(date);
        self.selection.start = start;
        self.selection.end = Some(end);
        self.refilter();
    }

    /// Postings passing the current filters.
    pub fn visible_records(&self) -> Vec<&JobRecord> {
        match &self.dataset {
            Some(ds) => ds.select(&self.visible_indices).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(date: &str, location: &str) -> JobRecord {
        JobRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            title: "Data Analyst".into(),
            locations: location.into(),
            salary: None,
            num_jobs: 1,
            company: String::new(),
            sectors: None,
            skills: None,
            soft_skills: None,
            language: None,
            education_level: None,
            work_mode: None,
            city: None,
            link: String::new(),
        }
    }

    fn state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_records(vec![
            posting("2024-02-01", "Quebec"),
            posting("2024-05-01", "Alberta"),
            posting("2024-11-01", "Quebec"),
        ]));
        state
    }

    #[test]
    fn home_page_ignores_province() {
        let mut state = state();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);

        state.set_page(Page::Overview);
        assert_eq!(state.visible_indices, vec![0, 2]);

        state.set_page(Page::Home);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn default_province_follows_file_order() {
        let state = state();
        assert_eq!(state.selection.location.as_deref(), Some("Quebec"));

        let mut state = AppState::default();
        state.set_dataset(Dataset::from_records(vec![
            posting("2024-03-01", ""),
            posting("2024-04-01", "Ontario"),
            posting("2024-05-01", "Alberta"),
        ]));
        assert_eq!(state.selection.location.as_deref(), Some("Ontario"));
    }

    #[test]
    fn previous_quarter_narrows_dates() {
        let mut state = state();
        state.select_previous_quarter_of(NaiveDate::from_ymd_opt(2024, 7, 20).unwrap());
        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.visible_records().len(), 1);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = state();
        state.load_from(Path::new("does/not/exist.json"));
        assert!(state.status_message.is_some());
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(3));
    }
}
