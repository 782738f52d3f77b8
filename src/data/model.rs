use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Column headers shared by the loader and the CSV export
// ---------------------------------------------------------------------------

/// Headers of the core results-sheet columns. Indicator and demographic
/// headers live on [`Indicator::column`] and [`Demographic::column`].
pub mod col {
    pub const TRACT: &str = "Census Tract";
    pub const COUNTY: &str = "California County";
    pub const LOCATION: &str = "Approximate Location";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const SCORE: &str = "CES 4.0 Score";
    pub const PERCENTILE: &str = "CES 4.0 Percentile";
    pub const POPULATION: &str = "Total Population";
}

// ---------------------------------------------------------------------------
// Indicator – fixed catalog of pollution/health sub-indicators
// ---------------------------------------------------------------------------

/// A pollution or health-exposure sub-indicator tracked per tract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Pm25,
    DieselPm,
    DrinkingWater,
    Pesticides,
    Lead,
    Asthma,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::Pm25,
        Indicator::DieselPm,
        Indicator::DrinkingWater,
        Indicator::Pesticides,
        Indicator::Lead,
        Indicator::Asthma,
    ];

    /// The indicators ranked in the pollution-drivers chart. Asthma is kept
    /// out of the ranking; it only enriches the map hover label.
    pub const RANKED: [Indicator; 5] = [
        Indicator::Pm25,
        Indicator::DieselPm,
        Indicator::DrinkingWater,
        Indicator::Pesticides,
        Indicator::Lead,
    ];

    /// Indicators surfaced in map marker hover text.
    pub const MAP_HOVER: [Indicator; 2] = [Indicator::Pm25, Indicator::Asthma];

    /// Column header in the results sheet.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Pm25 => "PM2.5 Pctl",
            Indicator::DieselPm => "Diesel PM Pctl",
            Indicator::DrinkingWater => "Drinking Water Pctl",
            Indicator::Pesticides => "Pesticides Pctl",
            Indicator::Lead => "Lead Pctl",
            Indicator::Asthma => "Asthma Pctl",
        }
    }

    /// Short display label for charts and hover text.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Pm25 => "PM2.5",
            Indicator::DieselPm => "Diesel PM",
            Indicator::DrinkingWater => "Drinking Water",
            Indicator::Pesticides => "Pesticides",
            Indicator::Lead => "Lead",
            Indicator::Asthma => "Asthma",
        }
    }
}

/// Per-tract indicator percentiles. Cells are optional: a column may be
/// present in the sheet while individual rows are blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorValues {
    pub pm25: Option<f64>,
    pub diesel_pm: Option<f64>,
    pub drinking_water: Option<f64>,
    pub pesticides: Option<f64>,
    pub lead: Option<f64>,
    pub asthma: Option<f64>,
}

impl IndicatorValues {
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Pm25 => self.pm25,
            Indicator::DieselPm => self.diesel_pm,
            Indicator::DrinkingWater => self.drinking_water,
            Indicator::Pesticides => self.pesticides,
            Indicator::Lead => self.lead,
            Indicator::Asthma => self.asthma,
        }
    }

    pub fn set(&mut self, indicator: Indicator, value: Option<f64>) {
        match indicator {
            Indicator::Pm25 => self.pm25 = value,
            Indicator::DieselPm => self.diesel_pm = value,
            Indicator::DrinkingWater => self.drinking_water = value,
            Indicator::Pesticides => self.pesticides = value,
            Indicator::Lead => self.lead = value,
            Indicator::Asthma => self.asthma = value,
        }
    }
}

// ---------------------------------------------------------------------------
// Demographic – fixed catalog of demographic groups
// ---------------------------------------------------------------------------

/// A demographic group reported per tract in the demographic-profile sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Demographic {
    Hispanic,
    White,
    AfricanAmerican,
    NativeAmerican,
    AsianAmerican,
    ChildrenUnder10,
    ElderlyOver64,
}

impl Demographic {
    pub const ALL: [Demographic; 7] = [
        Demographic::Hispanic,
        Demographic::White,
        Demographic::AfricanAmerican,
        Demographic::NativeAmerican,
        Demographic::AsianAmerican,
        Demographic::ChildrenUnder10,
        Demographic::ElderlyOver64,
    ];

    /// Racial/ethnic groups shown in the composition donut.
    pub const RACE_GROUPS: [Demographic; 5] = [
        Demographic::Hispanic,
        Demographic::White,
        Demographic::AfricanAmerican,
        Demographic::NativeAmerican,
        Demographic::AsianAmerican,
    ];

    /// Age groups reported as sensitive populations.
    pub const SENSITIVE: [Demographic; 2] =
        [Demographic::ChildrenUnder10, Demographic::ElderlyOver64];

    /// Column header in the demographic-profile sheet.
    pub fn column(self) -> &'static str {
        match self {
            Demographic::Hispanic => "Hispanic (%)",
            Demographic::White => "White (%)",
            Demographic::AfricanAmerican => "African American (%)",
            Demographic::NativeAmerican => "Native American (%)",
            Demographic::AsianAmerican => "Asian American (%)",
            Demographic::ChildrenUnder10 => "Children < 10 years (%)",
            Demographic::ElderlyOver64 => "Elderly > 64 years (%)",
        }
    }

    /// Display label without the unit suffix.
    pub fn label(self) -> &'static str {
        match self {
            Demographic::Hispanic => "Hispanic",
            Demographic::White => "White",
            Demographic::AfricanAmerican => "African American",
            Demographic::NativeAmerican => "Native American",
            Demographic::AsianAmerican => "Asian American",
            Demographic::ChildrenUnder10 => "Children < 10 years",
            Demographic::ElderlyOver64 => "Elderly > 64 years",
        }
    }
}

/// Per-tract demographic percentages, all optional: the column may be absent
/// from the sheet, or the tract may be missing from the demographic sheet
/// entirely (the left join keeps the tract with empty demographics).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemographicValues {
    pub hispanic: Option<f64>,
    pub white: Option<f64>,
    pub african_american: Option<f64>,
    pub native_american: Option<f64>,
    pub asian_american: Option<f64>,
    pub children_under_10: Option<f64>,
    pub elderly_over_64: Option<f64>,
}

impl DemographicValues {
    pub fn get(&self, group: Demographic) -> Option<f64> {
        match group {
            Demographic::Hispanic => self.hispanic,
            Demographic::White => self.white,
            Demographic::AfricanAmerican => self.african_american,
            Demographic::NativeAmerican => self.native_american,
            Demographic::AsianAmerican => self.asian_american,
            Demographic::ChildrenUnder10 => self.children_under_10,
            Demographic::ElderlyOver64 => self.elderly_over_64,
        }
    }

    pub fn set(&mut self, group: Demographic, value: Option<f64>) {
        match group {
            Demographic::Hispanic => self.hispanic = value,
            Demographic::White => self.white = value,
            Demographic::AfricanAmerican => self.african_american = value,
            Demographic::NativeAmerican => self.native_american = value,
            Demographic::AsianAmerican => self.asian_american = value,
            Demographic::ChildrenUnder10 => self.children_under_10 = value,
            Demographic::ElderlyOver64 => self.elderly_over_64 = value,
        }
    }
}

// ---------------------------------------------------------------------------
// TractRecord – one census tract after the demographic merge
// ---------------------------------------------------------------------------

/// One census tract (one results row with demographics joined on).
#[derive(Debug, Clone, PartialEq)]
pub struct TractRecord {
    /// Canonical tract identifier; unique within a loaded dataset.
    pub tract: String,
    pub county: String,
    /// Approximate location label, may be empty.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Cumulative CES score.
    pub score: f64,
    /// Statewide percentile rank of the score, within [0, 100].
    pub percentile: f64,
    pub population: f64,
    pub indicators: IndicatorValues,
    pub demographics: DemographicValues,
}

// ---------------------------------------------------------------------------
// Dataset – the merged table plus column capabilities computed at load
// ---------------------------------------------------------------------------

/// The fully merged dataset. Which optional columns the source actually
/// carried is computed once here; downstream code consumes these lists
/// instead of re-probing the schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All tracts (rows), in sheet order.
    pub records: Vec<TractRecord>,
    /// Sorted unique county names, for the filter panel.
    pub counties: Vec<String>,
    /// Indicator columns present in the results sheet, catalog order.
    pub indicators: Vec<Indicator>,
    /// Demographic columns present in the demographic sheet, catalog order.
    pub demographics: Vec<Demographic>,
}

impl Dataset {
    /// Build the county index from loaded records.
    pub fn from_records(
        records: Vec<TractRecord>,
        indicators: Vec<Indicator>,
        demographics: Vec<Demographic>,
    ) -> Self {
        let counties: BTreeSet<String> =
            records.iter().map(|r| r.county.clone()).collect();
        Dataset {
            records,
            counties: counties.into_iter().collect(),
            indicators,
            demographics,
        }
    }

    /// Number of tracts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counties_are_sorted_and_unique() {
        let mk = |county: &str| TractRecord {
            tract: county.to_lowercase(),
            county: county.to_string(),
            location: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            score: 0.0,
            percentile: 0.0,
            population: 0.0,
            indicators: IndicatorValues::default(),
            demographics: DemographicValues::default(),
        };
        let ds = Dataset::from_records(
            vec![mk("Kern"), mk("Fresno"), mk("Kern"), mk("Alameda")],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(ds.counties, vec!["Alameda", "Fresno", "Kern"]);
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn indicator_cells_round_trip_through_the_catalog() {
        let mut values = IndicatorValues::default();
        for (i, indicator) in Indicator::ALL.into_iter().enumerate() {
            values.set(indicator, Some(i as f64));
        }
        for (i, indicator) in Indicator::ALL.into_iter().enumerate() {
            assert_eq!(values.get(indicator), Some(i as f64));
        }
    }

    #[test]
    fn demographic_cells_round_trip_through_the_catalog() {
        let mut values = DemographicValues::default();
        for (i, group) in Demographic::ALL.into_iter().enumerate() {
            values.set(group, Some(10.0 * i as f64));
        }
        for (i, group) in Demographic::ALL.into_iter().enumerate() {
            assert_eq!(values.get(group), Some(10.0 * i as f64));
        }
        assert_eq!(DemographicValues::default().get(Demographic::White), None);
    }
}
