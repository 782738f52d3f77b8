use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{col, Dataset, TractRecord};

/// Default artifact name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "filtered_calenviroscreen_data.csv";

// ---------------------------------------------------------------------------
// CSV serialization of a filtered view
// ---------------------------------------------------------------------------

/// Export header: the core results columns, then whichever indicator and
/// demographic columns the dataset carries, in catalog order. The export
/// writes the full column set, not just the display columns.
pub fn export_columns(dataset: &Dataset) -> Vec<&'static str> {
    let mut columns = vec![
        col::TRACT,
        col::COUNTY,
        col::LOCATION,
        col::LATITUDE,
        col::LONGITUDE,
        col::SCORE,
        col::PERCENTILE,
        col::POPULATION,
    ];
    columns.extend(dataset.indicators.iter().map(|i| i.column()));
    columns.extend(dataset.demographics.iter().map(|g| g.column()));
    columns
}

/// Serialize the filtered view as CSV: UTF-8, header row always present
/// (an empty view produces a header-only file), no index column, blank
/// cells for absent optional values.
pub fn write_csv<W: Write>(dataset: &Dataset, view: &[usize], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(export_columns(dataset))
        .context("writing CSV header")?;
    for &idx in view {
        writer
            .write_record(record_row(dataset, &dataset.records[idx]))
            .context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// The view as in-memory CSV bytes.
pub fn to_csv_bytes(dataset: &Dataset, view: &[usize]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(dataset, view, &mut buf)?;
    Ok(buf)
}

/// Write the view to a file on disk.
pub fn write_csv_file(dataset: &Dataset, view: &[usize], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating '{}'", path.display()))?;
    write_csv(dataset, view, file)
}

fn record_row(dataset: &Dataset, record: &TractRecord) -> Vec<String> {
    let mut row = vec![
        record.tract.clone(),
        record.county.clone(),
        record.location.clone(),
        record.latitude.to_string(),
        record.longitude.to_string(),
        record.score.to_string(),
        record.percentile.to_string(),
        record.population.to_string(),
    ];
    row.extend(
        dataset
            .indicators
            .iter()
            .map(|&i| opt_cell(record.indicators.get(i))),
    );
    row.extend(
        dataset
            .demographics
            .iter()
            .map(|&g| opt_cell(record.demographics.get(g))),
    );
    row
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testdata;

    #[test]
    fn column_order_is_core_then_indicators_then_demographics() {
        let dataset = testdata::rich_dataset();
        assert_eq!(
            export_columns(&dataset),
            vec![
                "Census Tract",
                "California County",
                "Approximate Location",
                "Latitude",
                "Longitude",
                "CES 4.0 Score",
                "CES 4.0 Percentile",
                "Total Population",
                "PM2.5 Pctl",
                "Diesel PM Pctl",
                "Pesticides Pctl",
                "Lead Pctl",
                "Asthma Pctl",
                "Hispanic (%)",
                "African American (%)",
                "Native American (%)",
                "Asian American (%)",
                "Children < 10 years (%)",
            ]
        );
    }

    #[test]
    fn round_trips_the_filtered_view() {
        let dataset = testdata::rich_dataset();
        let view: Vec<usize> = (0..dataset.len()).collect();

        let bytes = to_csv_bytes(&dataset, &view).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), export_columns(&dataset).len());

        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), view.len());

        let kern = &rows[1];
        assert_eq!(&kern[0], "6029001200");
        assert_eq!(&kern[1], "Kern");
        assert_eq!(kern[6].parse::<f64>().unwrap(), 50.0);
        assert_eq!(kern[7].parse::<f64>().unwrap(), 4000.0);

        // Blank cells for absent values, parsed values for present ones.
        let pesticides = headers.iter().position(|h| h == "Pesticides Pctl").unwrap();
        assert_eq!(&kern[pesticides], "");
        let hispanic = headers.iter().position(|h| h == "Hispanic (%)").unwrap();
        assert_eq!(&kern[hispanic], "");
        assert_eq!(rows[0][hispanic].parse::<f64>().unwrap(), 50.0);
    }

    #[test]
    fn exports_only_the_view_not_the_whole_dataset() {
        let dataset = testdata::rich_dataset();
        let bytes = to_csv_bytes(&dataset, &[2]).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "6037001300");
    }

    #[test]
    fn empty_view_writes_a_header_only_file() {
        let dataset = testdata::rich_dataset();
        let bytes = to_csv_bytes(&dataset, &[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(
            text.lines().next().unwrap(),
            export_columns(&dataset).join(",")
        );
    }
}
