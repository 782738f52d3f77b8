use super::model::{Dataset, Demographic, Indicator, TractRecord};

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

/// Headline numbers over a filtered view. `mean_percentile` is `None` for an
/// empty view so the UI can show "no data" instead of a NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub tract_count: usize,
    pub mean_percentile: Option<f64>,
    pub total_population: f64,
}

/// Compute the headline metrics for the given view.
pub fn summarize(dataset: &Dataset, view: &[usize]) -> Summary {
    let mut population = 0.0;
    for record in records(dataset, view) {
        population += record.population;
    }
    Summary {
        tract_count: view.len(),
        mean_percentile: mean(records(dataset, view).map(|r| r.percentile)),
        total_population: population,
    }
}

// ---------------------------------------------------------------------------
// Ranked indicator means
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorMean {
    pub indicator: Indicator,
    pub mean: f64,
}

/// Mean percentile of each ranked indicator over the view, ascending by
/// mean. Indicators whose column is absent from the dataset, or that have
/// no values in the view, are omitted rather than reported as zero.
pub fn ranked_indicator_means(dataset: &Dataset, view: &[usize]) -> Vec<IndicatorMean> {
    let mut means: Vec<IndicatorMean> = Indicator::RANKED
        .into_iter()
        .filter(|indicator| dataset.indicators.contains(indicator))
        .filter_map(|indicator| {
            let cells = records(dataset, view).filter_map(|r| r.indicators.get(indicator));
            mean(cells).map(|mean| IndicatorMean { indicator, mean })
        })
        .collect();
    means.sort_by(|a, b| a.mean.total_cmp(&b.mean));
    means
}

// ---------------------------------------------------------------------------
// Demographic means
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DemographicMean {
    pub group: Demographic,
    pub mean_pct: f64,
}

/// Mean percentage of each racial/ethnic group over the view, restricted to
/// the groups the dataset actually carries. Empty views produce an empty
/// list (the composition chart is suppressed, not zeroed).
pub fn demographic_means(dataset: &Dataset, view: &[usize]) -> Vec<DemographicMean> {
    group_means(dataset, view, &Demographic::RACE_GROUPS)
}

/// Mean percentage of the sensitive-population groups (children, elderly)
/// over the view, with the same presence rules as [`demographic_means`].
pub fn sensitive_population_means(dataset: &Dataset, view: &[usize]) -> Vec<DemographicMean> {
    group_means(dataset, view, &Demographic::SENSITIVE)
}

fn group_means(dataset: &Dataset, view: &[usize], groups: &[Demographic]) -> Vec<DemographicMean> {
    groups
        .iter()
        .filter(|group| dataset.demographics.contains(group))
        .filter_map(|&group| {
            let cells = records(dataset, view).filter_map(|r| r.demographics.get(group));
            mean(cells).map(|mean_pct| DemographicMean { group, mean_pct })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn records<'a>(
    dataset: &'a Dataset,
    view: &'a [usize],
) -> impl Iterator<Item = &'a TractRecord> + 'a {
    view.iter().map(|&idx| &dataset.records[idx])
}

/// Arithmetic mean, `None` when the iterator yields nothing.
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    #[test]
    fn summarizes_counts_means_and_population() {
        let dataset = testdata::three_tracts();
        let view: Vec<usize> = (0..dataset.len()).collect();
        let summary = summarize(&dataset, &view);
        assert_eq!(summary.tract_count, 3);
        // Percentiles 90, 50, 95.
        let mean = summary.mean_percentile.unwrap();
        assert!((mean - 78.333).abs() < 0.001);
        assert_eq!(summary.total_population, 3200.0 + 1500.0 + 4100.0);
    }

    #[test]
    fn empty_view_yields_no_data_not_nan() {
        let dataset = testdata::three_tracts();
        let summary = summarize(&dataset, &[]);
        assert_eq!(summary.tract_count, 0);
        assert_eq!(summary.mean_percentile, None);
        assert_eq!(summary.total_population, 0.0);
        assert!(ranked_indicator_means(&dataset, &[]).is_empty());
        assert!(demographic_means(&dataset, &[]).is_empty());
        assert!(sensitive_population_means(&dataset, &[]).is_empty());
    }

    #[test]
    fn indicator_means_rank_ascending_over_present_columns() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();
        let ranked = ranked_indicator_means(&dataset, &view);

        // Drinking Water is absent from the dataset and must not appear.
        assert!(ranked
            .iter()
            .all(|m| m.indicator != Indicator::DrinkingWater));
        for pair in ranked.windows(2) {
            assert!(pair[0].mean <= pair[1].mean);
        }
        // Pesticides has one blank cell: mean of the remaining values.
        let pesticides = ranked
            .iter()
            .find(|m| m.indicator == Indicator::Pesticides)
            .unwrap();
        assert!((pesticides.mean - 15.0).abs() < 1e-9);
    }

    #[test]
    fn demographic_means_cover_present_race_groups_only() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();

        let means = demographic_means(&dataset, &view);
        let groups: Vec<Demographic> = means.iter().map(|m| m.group).collect();
        // White is absent from the dataset columns; the rest of the race
        // catalog is present.
        assert_eq!(
            groups,
            vec![
                Demographic::Hispanic,
                Demographic::AfricanAmerican,
                Demographic::NativeAmerican,
                Demographic::AsianAmerican
            ]
        );
        let hispanic = means
            .iter()
            .find(|m| m.group == Demographic::Hispanic)
            .unwrap();
        assert!((hispanic.mean_pct - 60.0).abs() < 1e-9);

        // Sensitive populations are reported separately from the race donut.
        let sensitive = sensitive_population_means(&dataset, &view);
        assert_eq!(sensitive.len(), 1);
        assert_eq!(sensitive[0].group, Demographic::ChildrenUnder10);
    }

    #[test]
    fn cells_missing_from_single_records_are_skipped_not_zeroed() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();
        // Tract 1 has no Hispanic cell; the mean divides by the two tracts
        // that do have one, not by the view size.
        let means = demographic_means(&dataset, &view);
        let hispanic = means
            .iter()
            .find(|m| m.group == Demographic::Hispanic)
            .unwrap();
        assert_ne!(hispanic.mean_pct, (50.0 + 70.0) / 3.0);
    }
}
