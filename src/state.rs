use std::path::PathBuf;
use std::sync::Arc;

use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader::DatasetCache;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Workbook currently shown (or last attempted).
    pub workbook_path: PathBuf,

    /// Memoized loader, keyed on path and modification time.
    cache: DatasetCache,

    /// Loaded dataset (None until a workbook loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Active county and percentile selection.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current criteria (cached).
    pub view: Vec<usize>,

    /// Loader error shown instead of the dashboard until a workbook loads.
    pub load_error: Option<String>,

    /// Status line shown in the top bar after loads and exports.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(workbook_path: PathBuf) -> Self {
        Self {
            workbook_path,
            cache: DatasetCache::default(),
            dataset: None,
            criteria: FilterCriteria::default(),
            view: Vec::new(),
            load_error: None,
            status_message: None,
        }
    }

    /// (Re)load the current workbook through the cache.
    pub fn load_workbook(&mut self) {
        self.load_from(self.workbook_path.clone());
    }

    /// Load a workbook, replacing the dataset on success. On failure the
    /// loader error is kept verbatim for the UI and no partial dashboard
    /// is shown.
    pub fn load_from(&mut self, path: PathBuf) {
        log::info!("Loading workbook '{}'", path.display());
        match self.cache.load(&path) {
            Ok(dataset) => {
                self.workbook_path = path;
                self.set_dataset(dataset);
            }
            Err(err) => {
                log::error!("Workbook load failed: {err}");
                self.workbook_path = path;
                self.dataset = None;
                self.view.clear();
                self.load_error = Some(err.to_string());
                self.status_message = None;
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the selection to the
    /// defaults that apply to it.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.criteria = FilterCriteria::default_for(&dataset);
        self.view = filtered_indices(&dataset, &self.criteria);
        self.status_message = Some(format!("Loaded {} census tracts", dataset.len()));
        self.load_error = None;
        self.dataset = Some(dataset);
    }

    /// Recompute the view after a criteria change.
    pub fn refilter(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.view = filtered_indices(dataset, &self.criteria);
        }
    }

    /// Toggle a single county in the selection.
    pub fn toggle_county(&mut self, county: &str) {
        if !self.criteria.counties.remove(county) {
            self.criteria.counties.insert(county.to_string());
        }
        self.refilter();
    }

    /// Select every county the dataset carries.
    pub fn select_all_counties(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.criteria.counties = dataset.counties.iter().cloned().collect();
        }
        self.refilter();
    }

    /// Clear the county selection. An empty set means "no county
    /// restriction", so this widens the view rather than emptying it.
    pub fn clear_counties(&mut self) {
        self.criteria.counties.clear();
        self.refilter();
    }

    /// Update the percentile window and refilter.
    pub fn set_percentile_range(&mut self, lo: f64, hi: f64) {
        self.criteria.set_percentile_range(lo, hi);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    fn state_with_dataset() -> AppState {
        let mut state = AppState::new(PathBuf::from("unused.xlsx"));
        state.set_dataset(Arc::new(testdata::three_tracts()));
        state
    }

    #[test]
    fn new_dataset_resets_criteria_to_the_defaults() {
        let state = state_with_dataset();
        let counties: Vec<&str> =
            state.criteria.counties.iter().map(String::as_str).collect();
        assert_eq!(counties, vec!["Fresno", "Los Angeles"]);
        assert_eq!(state.criteria.min_percentile, 75.0);
        assert_eq!(state.criteria.max_percentile, 100.0);
        assert_eq!(state.view, vec![0, 2]);
        assert!(state.load_error.is_none());
    }

    #[test]
    fn toggling_counties_updates_the_view() {
        let mut state = state_with_dataset();
        state.toggle_county("Fresno");
        assert_eq!(state.view, vec![2]);

        // Kern is selected but sits below the percentile floor.
        state.toggle_county("Kern");
        assert_eq!(state.view, vec![2]);

        state.set_percentile_range(0.0, 100.0);
        assert_eq!(state.view, vec![1, 2]);
    }

    #[test]
    fn clearing_counties_widens_to_every_county() {
        let mut state = state_with_dataset();
        state.clear_counties();
        assert_eq!(state.view, vec![0, 2]);

        state.set_percentile_range(0.0, 100.0);
        assert_eq!(state.view, vec![0, 1, 2]);
    }

    #[test]
    fn select_all_matches_clearing_at_full_range() {
        let mut state = state_with_dataset();
        state.set_percentile_range(0.0, 100.0);
        state.select_all_counties();
        assert_eq!(state.view, vec![0, 1, 2]);
        assert_eq!(state.criteria.counties.len(), 3);
    }

    #[test]
    fn failed_load_clears_the_dataset_and_keeps_the_error() {
        let mut state = state_with_dataset();
        state.load_from(PathBuf::from("no-such-workbook.xlsx"));
        assert!(state.dataset.is_none());
        assert!(state.view.is_empty());
        let error = state.load_error.as_deref().unwrap();
        assert!(error.contains("no-such-workbook.xlsx"));
    }
}
