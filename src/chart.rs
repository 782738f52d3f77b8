//! Chart specifications derived from a filtered view.
//!
//! Everything here is plain data: marker positions, bar values, slice
//! fractions and hover text. The widgets in `ui::charts` only draw what
//! these builders produce, which keeps the numbers testable without a
//! running UI.

use crate::data::model::{col, Dataset, Indicator};
use crate::data::summary::{self, DemographicMean, IndicatorMean};

// ---------------------------------------------------------------------------
// Map of tract markers
// ---------------------------------------------------------------------------

pub const MIN_MARKER_RADIUS: f32 = 2.0;
pub const MAX_MARKER_RADIUS: f32 = 9.0;

/// One tract on the map. `percentile` drives the marker colour on the
/// fixed [0, 100] scale; `radius` already encodes population.
#[derive(Debug, Clone)]
pub struct MapMarker {
    pub lon: f64,
    pub lat: f64,
    pub percentile: f64,
    pub radius: f32,
    pub hover: String,
}

#[derive(Debug, Clone, Default)]
pub struct MapSpec {
    pub markers: Vec<MapMarker>,
}

impl MapSpec {
    /// X units per y unit so east-west distances read roughly true at the
    /// latitude of the plotted tracts.
    pub fn aspect_ratio(&self) -> f32 {
        if self.markers.is_empty() {
            return 1.0;
        }
        let mean_lat =
            self.markers.iter().map(|m| m.lat).sum::<f64>() / self.markers.len() as f64;
        (1.0 / mean_lat.to_radians().cos().max(0.1)) as f32
    }
}

/// Build map markers for the view. Marker area scales with population
/// relative to the largest tract in the view, clamped to a fixed radius
/// band so sparse tracts stay visible.
pub fn map_spec(dataset: &Dataset, view: &[usize]) -> MapSpec {
    let max_pop = view
        .iter()
        .map(|&i| dataset.records[i].population)
        .fold(0.0_f64, f64::max);

    let markers = view
        .iter()
        .map(|&i| {
            let record = &dataset.records[i];
            let ratio = if max_pop > 0.0 {
                (record.population / max_pop).sqrt()
            } else {
                0.0
            };
            let radius =
                MIN_MARKER_RADIUS + (MAX_MARKER_RADIUS - MIN_MARKER_RADIUS) * ratio as f32;

            let mut hover = String::new();
            if !record.location.is_empty() {
                hover.push_str(&record.location);
                hover.push('\n');
            }
            hover.push_str(&format!("Tract {} ({})\n", record.tract, record.county));
            hover.push_str(&format!("{}: {:.1}\n", col::PERCENTILE, record.percentile));
            hover.push_str(&format!(
                "Population: {}",
                format_thousands(record.population)
            ));
            for indicator in Indicator::MAP_HOVER {
                if let Some(value) = record.indicators.get(indicator) {
                    hover.push_str(&format!("\n{}: {:.1}", indicator.column(), value));
                }
            }

            MapMarker {
                lon: record.longitude,
                lat: record.latitude,
                percentile: record.percentile,
                radius,
                hover,
            }
        })
        .collect();

    MapSpec { markers }
}

// ---------------------------------------------------------------------------
// Ranked indicator bars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RankedBar {
    pub label: &'static str,
    pub mean: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RankedBarChart {
    pub bars: Vec<RankedBar>,
}

/// Horizontal bars of mean indicator percentiles, smallest first so the
/// heaviest burden lands at the top of the chart.
pub fn ranked_bars(dataset: &Dataset, view: &[usize]) -> RankedBarChart {
    let bars = summary::ranked_indicator_means(dataset, view)
        .into_iter()
        .map(|IndicatorMean { indicator, mean }| RankedBar {
            label: indicator.column(),
            mean,
        })
        .collect();
    RankedBarChart { bars }
}

// ---------------------------------------------------------------------------
// Demographic composition donut
// ---------------------------------------------------------------------------

/// Hole size of the composition donut as a fraction of its outer radius.
pub const DONUT_HOLE: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct CompositionSlice {
    pub label: &'static str,
    /// Mean percentage of tract population for this group.
    pub pct: f64,
    /// Share of the full circle, normalized over the drawn groups.
    pub fraction: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CompositionChart {
    pub slices: Vec<CompositionSlice>,
}

/// Donut slices of mean race and ethnicity shares. Group means rarely sum
/// to exactly 100, so slice angles are normalized over the groups present.
pub fn composition(dataset: &Dataset, view: &[usize]) -> CompositionChart {
    let means = summary::demographic_means(dataset, view);
    let total: f64 = means.iter().map(|m| m.mean_pct).sum();
    if total <= 0.0 {
        return CompositionChart::default();
    }
    let slices = means
        .into_iter()
        .map(|DemographicMean { group, mean_pct }| CompositionSlice {
            label: group.label(),
            pct: mean_pct,
            fraction: mean_pct / total,
        })
        .collect();
    CompositionChart { slices }
}

// ---------------------------------------------------------------------------
// Detail table
// ---------------------------------------------------------------------------

/// Columns of the tract detail table, in display order.
pub const DETAIL_COLUMNS: [&str; 6] = [
    col::TRACT,
    col::COUNTY,
    col::LOCATION,
    col::SCORE,
    col::PERCENTILE,
    col::POPULATION,
];

/// Record indices of the view ordered by CES percentile, most burdened
/// tract first.
pub fn detail_rows(dataset: &Dataset, view: &[usize]) -> Vec<usize> {
    let mut rows = view.to_vec();
    rows.sort_by(|&a, &b| {
        dataset.records[b]
            .percentile
            .total_cmp(&dataset.records[a].percentile)
    });
    rows
}

/// Integer formatting with thousands separators for populations.
pub fn format_thousands(value: f64) -> String {
    let value = value.round() as i64;
    let digits = value.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    #[test]
    fn marker_radii_scale_with_population_inside_the_band() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();
        let spec = map_spec(&dataset, &view);

        // Populations 1000 / 4000 / 16000, area-proportional scaling.
        let radii: Vec<f32> = spec.markers.iter().map(|m| m.radius).collect();
        assert!((radii[0] - 3.75).abs() < 1e-5);
        assert!((radii[1] - 5.5).abs() < 1e-5);
        assert!((radii[2] - MAX_MARKER_RADIUS).abs() < 1e-5);
        for r in radii {
            assert!((MIN_MARKER_RADIUS..=MAX_MARKER_RADIUS).contains(&r));
        }
    }

    #[test]
    fn hover_carries_location_population_and_optional_indicators() {
        let dataset = testdata::rich_dataset();
        let spec = map_spec(&dataset, &[0]);
        let hover = &spec.markers[0].hover;

        assert!(hover.contains("Central Fresno"));
        assert!(hover.contains("Tract 6019001100 (Fresno)"));
        assert!(hover.contains("Population: 1,000"));
        assert!(hover.contains("PM2.5 Pctl: 80.0"));
        assert!(hover.contains("Asthma Pctl: 33.0"));

        // No hover lines for columns the workbook never carried.
        let plain = testdata::three_tracts();
        let spec = map_spec(&plain, &[0]);
        assert!(!spec.markers[0].hover.contains("Asthma"));
    }

    #[test]
    fn ranked_bars_rise_from_least_to_most_burdened() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();
        let chart = ranked_bars(&dataset, &view);

        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label).collect();
        assert_eq!(
            labels,
            vec!["Lead Pctl", "Pesticides Pctl", "PM2.5 Pctl", "Diesel PM Pctl"]
        );
        for pair in chart.bars.windows(2) {
            assert!(pair[0].mean <= pair[1].mean);
        }
    }

    #[test]
    fn composition_normalizes_over_present_groups() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();
        let chart = composition(&dataset, &view);

        let labels: Vec<&str> = chart.slices.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["Hispanic", "African American", "Native American", "Asian American"]
        );
        let total: f64 = chart.slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((chart.slices[0].pct - 60.0).abs() < 1e-9);
        assert!((chart.slices[0].fraction - 0.75).abs() < 1e-9);
    }

    #[test]
    fn detail_rows_sort_most_burdened_first() {
        let dataset = testdata::three_tracts();
        let rows = detail_rows(&dataset, &[0, 1, 2]);
        assert_eq!(rows, vec![2, 0, 1]);
    }

    #[test]
    fn empty_view_yields_empty_specs() {
        let dataset = testdata::rich_dataset();
        assert!(map_spec(&dataset, &[]).markers.is_empty());
        assert!(ranked_bars(&dataset, &[]).bars.is_empty());
        assert!(composition(&dataset, &[]).slices.is_empty());
        assert!(detail_rows(&dataset, &[]).is_empty());
        assert_eq!(map_spec(&dataset, &[]).aspect_ratio(), 1.0);
    }

    #[test]
    fn thousands_formatting() {
        assert_eq!(format_thousands(123.0), "123");
        assert_eq!(format_thousands(8800.0), "8,800");
        assert_eq!(format_thousands(1_234_567.6), "1,234,568");
        assert_eq!(format_thousands(-4200.0), "-4,200");
    }
}
