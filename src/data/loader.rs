use std::collections::{HashMap, HashSet};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use log::{debug, info, warn};
use thiserror::Error;

use super::model::{
    col, Dataset, Demographic, DemographicValues, Indicator, IndicatorValues, TractRecord,
};

/// Sheet holding one row per tract with scores and indicator percentiles.
pub const RESULTS_SHEET: &str = "CES4.0FINAL_results";
/// Sheet holding the demographic percentages, joined on by tract id.
pub const DEMOGRAPHICS_SHEET: &str = "Demographic Profile";

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Fatal load failures. Anything here halts the dashboard; the message
/// carries the underlying cause so the user sees it verbatim.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open workbook '{}': {source}", .path.display())]
    Workbook { path: PathBuf, source: XlsxError },

    #[error("could not read sheet '{sheet}': {source}")]
    Sheet { sheet: &'static str, source: XlsxError },

    #[error("sheet '{sheet}' has no header row")]
    EmptySheet { sheet: &'static str },

    #[error("sheet '{sheet}' is missing required column '{column}'")]
    MissingColumn {
        sheet: &'static str,
        column: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Load and merge the two workbook sheets into a [`Dataset`].
///
/// The results sheet provides one row per tract; demographic columns are
/// left-joined onto it by the normalized tract key, so every results row is
/// kept whether or not the demographic sheet knows the tract. Rows that
/// could never pass a percentile filter (missing or out-of-range percentile,
/// missing required numerics) are skipped with a warning instead of being
/// carried as never-matching records.
pub fn load_workbook(path: &Path) -> Result<Dataset, LoadError> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|source| LoadError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let results = read_sheet(&mut workbook, RESULTS_SHEET)?;
    let demographics = read_sheet(&mut workbook, DEMOGRAPHICS_SHEET)?;

    let (demo_by_tract, present_demographics) = parse_demographics(&demographics)?;
    let dataset = parse_results(&results, &demo_by_tract, present_demographics)?;

    info!(
        "loaded {} tracts across {} counties ({} indicator, {} demographic columns)",
        dataset.len(),
        dataset.counties.len(),
        dataset.indicators.len(),
        dataset.demographics.len()
    );
    Ok(dataset)
}

fn read_sheet(
    workbook: &mut Xlsx<BufReader<std::fs::File>>,
    sheet: &'static str,
) -> Result<Range<Data>, LoadError> {
    workbook
        .worksheet_range(sheet)
        .map_err(|source| LoadError::Sheet { sheet, source })
}

// ---------------------------------------------------------------------------
// Sheet parsing
// ---------------------------------------------------------------------------

/// Column header → zero-based column index for one sheet.
fn header_index(
    range: &Range<Data>,
    sheet: &'static str,
) -> Result<HashMap<String, usize>, LoadError> {
    let header_row = range.rows().next().ok_or(LoadError::EmptySheet { sheet })?;
    Ok(header_row
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| cell_string(cell).map(|name| (name, idx)))
        .collect())
}

type DemographicsByTract = HashMap<String, DemographicValues>;

/// Index the demographic sheet by normalized tract key.
///
/// Only catalog columns that actually exist in the sheet are read; dataset
/// versions drift and a missing group must not fail the load.
fn parse_demographics(
    range: &Range<Data>,
) -> Result<(DemographicsByTract, Vec<Demographic>), LoadError> {
    let headers = header_index(range, DEMOGRAPHICS_SHEET)?;
    let tract_idx = *headers.get(col::TRACT).ok_or(LoadError::MissingColumn {
        sheet: DEMOGRAPHICS_SHEET,
        column: col::TRACT,
    })?;

    let present: Vec<(Demographic, usize)> = Demographic::ALL
        .into_iter()
        .filter_map(|group| headers.get(group.column()).map(|&idx| (group, idx)))
        .collect();

    let mut by_tract = DemographicsByTract::new();
    let mut duplicates = 0usize;
    for row in range.rows().skip(1) {
        let Some(key) = row.get(tract_idx).and_then(tract_key) else {
            continue;
        };
        if by_tract.contains_key(&key) {
            duplicates += 1;
            continue;
        }
        let mut values = DemographicValues::default();
        for &(group, idx) in &present {
            values.set(group, row.get(idx).and_then(cell_f64));
        }
        by_tract.insert(key, values);
    }
    if duplicates > 0 {
        warn!("{DEMOGRAPHICS_SHEET}: ignored {duplicates} duplicate tract ids (first row kept)");
    }

    Ok((by_tract, present.iter().map(|&(group, _)| group).collect()))
}

/// Parse the results sheet and attach demographics to each kept row.
fn parse_results(
    range: &Range<Data>,
    demo_by_tract: &DemographicsByTract,
    present_demographics: Vec<Demographic>,
) -> Result<Dataset, LoadError> {
    let headers = header_index(range, RESULTS_SHEET)?;
    let required = |column: &'static str| {
        headers
            .get(column)
            .copied()
            .ok_or(LoadError::MissingColumn {
                sheet: RESULTS_SHEET,
                column,
            })
    };
    let tract_idx = required(col::TRACT)?;
    let county_idx = required(col::COUNTY)?;
    let location_idx = required(col::LOCATION)?;
    let latitude_idx = required(col::LATITUDE)?;
    let longitude_idx = required(col::LONGITUDE)?;
    let score_idx = required(col::SCORE)?;
    let percentile_idx = required(col::PERCENTILE)?;
    let population_idx = required(col::POPULATION)?;

    let present_indicators: Vec<(Indicator, usize)> = Indicator::ALL
        .into_iter()
        .filter_map(|indicator| headers.get(indicator.column()).map(|&idx| (indicator, idx)))
        .collect();

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut skipped = 0usize;
    let mut duplicates = 0usize;

    for row in range.rows().skip(1) {
        // Real sheets end with blank padding rows; not worth a warning.
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let ids = (
            row.get(tract_idx).and_then(tract_key),
            row.get(county_idx).and_then(cell_string),
        );
        let (Some(tract), Some(county)) = ids else {
            skipped += 1;
            continue;
        };

        let numerics = (
            row.get(latitude_idx).and_then(cell_f64),
            row.get(longitude_idx).and_then(cell_f64),
            row.get(score_idx).and_then(cell_f64),
            row.get(percentile_idx).and_then(cell_f64),
            row.get(population_idx).and_then(cell_f64),
        );
        let (Some(latitude), Some(longitude), Some(score), Some(percentile), Some(population)) =
            numerics
        else {
            skipped += 1;
            continue;
        };
        if !(0.0..=100.0).contains(&percentile) || population < 0.0 {
            skipped += 1;
            continue;
        }
        if !seen.insert(tract.clone()) {
            duplicates += 1;
            continue;
        }

        let mut indicators = IndicatorValues::default();
        for &(indicator, idx) in &present_indicators {
            indicators.set(indicator, row.get(idx).and_then(cell_f64));
        }
        let demographics = demo_by_tract.get(&tract).cloned().unwrap_or_default();

        records.push(TractRecord {
            tract,
            county,
            location: row
                .get(location_idx)
                .and_then(cell_string)
                .unwrap_or_default(),
            latitude,
            longitude,
            score,
            percentile,
            population,
            indicators,
            demographics,
        });
    }

    if skipped > 0 {
        warn!("{RESULTS_SHEET}: skipped {skipped} rows with missing or out-of-range required fields");
    }
    if duplicates > 0 {
        warn!("{RESULTS_SHEET}: ignored {duplicates} duplicate tract ids (first row kept)");
    }

    Ok(Dataset::from_records(
        records,
        present_indicators
            .iter()
            .map(|&(indicator, _)| indicator)
            .collect(),
        present_demographics,
    ))
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Non-empty trimmed text content of a cell, numbers included.
fn cell_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Numeric content of a cell; numeric-looking text parses too.
fn cell_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Canonical join key of a tract-id cell, whatever the cell's storage type.
/// Both sheets go through this, so a tract stored as a number in one and as
/// text in the other still matches.
fn tract_key(cell: &Data) -> Option<String> {
    let key = match cell {
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_key(*f)?,
        Data::String(s) => normalize_tract_id(s),
        _ => return None,
    };
    (!key.is_empty()).then_some(key)
}

/// Canonical string form of a textual tract id. Digit-only ids (numeric ids
/// stored as text, possibly zero-padded) reduce to their integer form so
/// they match the same id stored as a number; anything else is kept
/// verbatim, trimmed.
pub fn normalize_tract_id(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        return if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        };
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        if let Some(key) = float_key(value) {
            return key;
        }
    }
    trimmed.to_string()
}

fn float_key(value: f64) -> Option<String> {
    // Tract ids are integers; 2^53 bounds the exactly-representable range.
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(format!("{}", value as i64))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// DatasetCache – memoized load keyed on (path, modification time)
// ---------------------------------------------------------------------------

/// Process-local memo for the one-time workbook load. The workbook is
/// immutable for a session, so a hit returns the same `Arc<Dataset>`; the
/// key includes the modification time so a genuinely changed file at the
/// same path reloads.
#[derive(Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

struct CacheEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

impl DatasetCache {
    /// Load `path`, reusing the cached dataset when the key matches.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let modified = modification_time(path);
        if let Some(entry) = &self.entry {
            if entry.path == path && modified.is_some() && entry.modified == modified {
                debug!("workbook cache hit for '{}'", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }
        let dataset = Arc::new(load_workbook(path)?);
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }
}

fn modification_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}
