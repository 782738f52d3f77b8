use std::collections::BTreeSet;

use super::model::{Dataset, TractRecord};

// ---------------------------------------------------------------------------
// Filter criteria: county membership + percentile interval
// ---------------------------------------------------------------------------

/// Counties preselected when a fresh dataset comes in (kept only if the
/// dataset actually has them).
pub const DEFAULT_COUNTIES: [&str; 2] = ["Fresno", "Los Angeles"];

/// Default percentile interval; 75 is the conventional threshold above which
/// tracts are flagged as disadvantaged communities.
pub const DEFAULT_PERCENTILE_RANGE: (f64, f64) = (75.0, 100.0);

/// User-controlled filter state.
///
/// An empty county set means "no county constraint" and shows every county;
/// it never means "show nothing". The percentile interval is inclusive at
/// both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub counties: BTreeSet<String>,
    pub min_percentile: f64,
    pub max_percentile: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        FilterCriteria {
            counties: BTreeSet::new(),
            min_percentile: DEFAULT_PERCENTILE_RANGE.0,
            max_percentile: DEFAULT_PERCENTILE_RANGE.1,
        }
    }
}

impl FilterCriteria {
    /// Initial criteria for a freshly loaded dataset: the default counties
    /// intersected with what the dataset has, plus the default interval.
    /// A dataset without any default county starts unconstrained on the
    /// county axis rather than empty.
    pub fn default_for(dataset: &Dataset) -> Self {
        let counties: BTreeSet<String> = DEFAULT_COUNTIES
            .into_iter()
            .filter(|name| dataset.counties.iter().any(|c| c == name))
            .map(str::to_string)
            .collect();
        FilterCriteria {
            counties,
            ..FilterCriteria::default()
        }
    }

    /// Whether one record passes both filter axes.
    pub fn matches(&self, record: &TractRecord) -> bool {
        let county_ok = self.counties.is_empty() || self.counties.contains(&record.county);
        county_ok
            && record.percentile >= self.min_percentile
            && record.percentile <= self.max_percentile
    }

    /// Set the percentile interval, clamped to [0, 100] and ordered.
    pub fn set_percentile_range(&mut self, lo: f64, hi: f64) {
        let lo = lo.clamp(0.0, 100.0);
        let hi = hi.clamp(0.0, 100.0);
        self.min_percentile = lo.min(hi);
        self.max_percentile = lo.max(hi);
    }
}

/// Return indices of records that pass the current criteria.
///
/// Pure: the dataset is never mutated and identical inputs always produce
/// identical output, so callers may recompute freely on every change.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| criteria.matches(record))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    fn counties(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn county_and_percentile_filters_combine_with_and() {
        // Tracts: Fresno 90, Kern 50, Los Angeles 95.
        let dataset = testdata::three_tracts();
        let criteria = FilterCriteria {
            counties: counties(&["Fresno", "Los Angeles"]),
            min_percentile: 75.0,
            max_percentile: 100.0,
        };
        let view = filtered_indices(&dataset, &criteria);
        let percentiles: Vec<f64> = view
            .iter()
            .map(|&i| dataset.records[i].percentile)
            .collect();
        assert_eq!(percentiles, vec![90.0, 95.0]);
    }

    #[test]
    fn empty_county_set_shows_all_counties() {
        let dataset = testdata::three_tracts();
        let criteria = FilterCriteria {
            counties: BTreeSet::new(),
            min_percentile: 0.0,
            max_percentile: 100.0,
        };
        assert_eq!(filtered_indices(&dataset, &criteria), vec![0, 1, 2]);

        // With the full percentile interval, the view size depends only on
        // the percentile axis: an empty county set excludes nothing.
        let narrowed = FilterCriteria {
            counties: BTreeSet::new(),
            min_percentile: 60.0,
            max_percentile: 100.0,
        };
        assert_eq!(filtered_indices(&dataset, &narrowed).len(), 2);
    }

    #[test]
    fn percentile_bounds_are_inclusive() {
        let dataset = testdata::three_tracts();
        let criteria = FilterCriteria {
            counties: BTreeSet::new(),
            min_percentile: 50.0,
            max_percentile: 90.0,
        };
        let view = filtered_indices(&dataset, &criteria);
        // 50 and 90 are both kept, 95 is out.
        assert_eq!(view.len(), 2);
        for &idx in &view {
            let p = dataset.records[idx].percentile;
            assert!((50.0..=90.0).contains(&p));
        }
    }

    #[test]
    fn filtering_is_deterministic_and_leaves_the_dataset_alone() {
        let dataset = testdata::three_tracts();
        let before = dataset.records.clone();
        let criteria = FilterCriteria {
            counties: counties(&["Kern"]),
            min_percentile: 0.0,
            max_percentile: 100.0,
        };
        let first = filtered_indices(&dataset, &criteria);
        let second = filtered_indices(&dataset, &criteria);
        assert_eq!(first, second);
        assert_eq!(dataset.records, before);
    }

    #[test]
    fn default_criteria_intersect_with_available_counties() {
        let dataset = testdata::three_tracts();
        let criteria = FilterCriteria::default_for(&dataset);
        assert_eq!(criteria.counties, counties(&["Fresno", "Los Angeles"]));
        assert_eq!(criteria.min_percentile, 75.0);
        assert_eq!(criteria.max_percentile, 100.0);

        let only_kern = testdata::single_county("Kern");
        let criteria = FilterCriteria::default_for(&only_kern);
        assert!(criteria.counties.is_empty());
    }

    #[test]
    fn range_setter_clamps_and_orders() {
        let mut criteria = FilterCriteria::default();
        criteria.set_percentile_range(80.0, 20.0);
        assert_eq!((criteria.min_percentile, criteria.max_percentile), (20.0, 80.0));
        criteria.set_percentile_range(-5.0, 140.0);
        assert_eq!((criteria.min_percentile, criteria.max_percentile), (0.0, 100.0));
    }
}
