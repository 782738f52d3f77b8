use rust_xlsxwriter::{Workbook, XlsxError};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct County {
    name: &'static str,
    fips: u64,
    lat: f64,
    lon: f64,
    /// Typical pollution burden, used as the mean of score and indicators.
    burden: f64,
}

const COUNTIES: [County; 6] = [
    County { name: "Fresno", fips: 6019, lat: 36.75, lon: -119.80, burden: 58.0 },
    County { name: "Kern", fips: 6029, lat: 35.35, lon: -119.02, burden: 52.0 },
    County { name: "Los Angeles", fips: 6037, lat: 34.05, lon: -118.24, burden: 48.0 },
    County { name: "Alameda", fips: 6001, lat: 37.65, lon: -122.00, burden: 30.0 },
    County { name: "Imperial", fips: 6025, lat: 32.85, lon: -115.45, burden: 55.0 },
    County { name: "Sacramento", fips: 6067, lat: 38.58, lon: -121.49, burden: 38.0 },
];

const TRACTS_PER_COUNTY: usize = 20;

const RESULTS_HEADER: [&str; 14] = [
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
    "Drinking Water Pctl",
    "Pesticides Pctl",
    "Lead Pctl",
    "Asthma Pctl",
];

const DEMOGRAPHICS_HEADER: [&str; 10] = [
    "Census Tract",
    "California County",
    "Total Population",
    "Hispanic (%)",
    "White (%)",
    "African American (%)",
    "Native American (%)",
    "Asian American (%)",
    "Children < 10 years (%)",
    "Elderly > 64 years (%)",
];

struct Tract {
    id: u64,
    county: &'static str,
    location: String,
    lat: f64,
    lon: f64,
    score: f64,
    population: f64,
    indicators: [Option<f64>; 6],
    demographics: [f64; 7],
}

fn clamp_pct(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);

    // Synthesize tracts around each county anchor.
    let mut tracts: Vec<Tract> = Vec::new();
    for county in &COUNTIES {
        for i in 0..TRACTS_PER_COUNTY {
            let id = county.fips * 1_000_000 + 100 + 100 * i as u64;
            let score = (county.burden + rng.gauss(0.0, 12.0)).clamp(0.5, 95.0);
            let population = rng.gauss(4500.0, 1500.0).max(200.0).round();

            let mut indicators = [None; 6];
            for slot in indicators.iter_mut() {
                // Leave the occasional cell blank, like the real workbook.
                if rng.next_f64() < 0.04 {
                    continue;
                }
                *slot = Some(clamp_pct(county.burden + rng.gauss(0.0, 20.0)));
            }

            // Race shares sum to roughly 97, leaving a remainder for
            // groups the profile sheet does not break out.
            let weights = [40.0, 30.0, 6.0, 1.0, 15.0];
            let raw: Vec<f64> = weights
                .iter()
                .map(|w| w * (0.5 + rng.next_f64()))
                .collect();
            let total: f64 = raw.iter().sum();
            let mut demographics = [0.0; 7];
            for (slot, r) in demographics.iter_mut().zip(raw.iter()) {
                *slot = r / total * 97.0;
            }
            demographics[5] = clamp_pct(12.0 + rng.gauss(0.0, 4.0));
            demographics[6] = clamp_pct(13.0 + rng.gauss(0.0, 5.0));

            tracts.push(Tract {
                id,
                county: county.name,
                location: format!("{} area {}", county.name, i + 1),
                lat: county.lat + rng.gauss(0.0, 0.12),
                lon: county.lon + rng.gauss(0.0, 0.15),
                score,
                population,
                indicators,
                demographics,
            });
        }
    }

    // Statewide percentile rank of the composite score.
    let mut order: Vec<usize> = (0..tracts.len()).collect();
    order.sort_by(|&a, &b| tracts[a].score.total_cmp(&tracts[b].score));
    let mut percentile = vec![0.0; tracts.len()];
    for (rank, &idx) in order.iter().enumerate() {
        percentile[idx] = rank as f64 * 100.0 / (tracts.len() - 1) as f64;
    }

    let mut workbook = Workbook::new();

    // ---- Results sheet ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("CES4.0FINAL_results")?;
    for (c, header) in RESULTS_HEADER.iter().enumerate() {
        sheet.write_string(0, c as u16, *header)?;
    }
    for (r, tract) in tracts.iter().enumerate() {
        let row = r as u32 + 1;
        sheet.write_number(row, 0, tract.id as f64)?;
        sheet.write_string(row, 1, tract.county)?;
        sheet.write_string(row, 2, &tract.location)?;
        sheet.write_number(row, 3, tract.lat)?;
        sheet.write_number(row, 4, tract.lon)?;
        sheet.write_number(row, 5, tract.score)?;
        sheet.write_number(row, 6, percentile[r])?;
        sheet.write_number(row, 7, tract.population)?;
        for (c, value) in tract.indicators.iter().enumerate() {
            if let Some(value) = value {
                sheet.write_number(row, 8 + c as u16, *value)?;
            }
        }
    }

    // ---- Demographic profile sheet ----
    let sheet = workbook.add_worksheet();
    sheet.set_name("Demographic Profile")?;
    for (c, header) in DEMOGRAPHICS_HEADER.iter().enumerate() {
        sheet.write_string(0, c as u16, *header)?;
    }
    let mut out_row = 1u32;
    let mut skipped = 0usize;
    for (i, tract) in tracts.iter().enumerate() {
        // Some tracts have no demographic profile at all.
        if i % 17 == 9 {
            skipped += 1;
            continue;
        }
        // Mix id spellings: plain numbers and zero-padded text GEOIDs.
        if i % 5 == 0 {
            sheet.write_string(out_row, 0, format!("0{}", tract.id))?;
        } else {
            sheet.write_number(out_row, 0, tract.id as f64)?;
        }
        sheet.write_string(out_row, 1, tract.county)?;
        sheet.write_number(out_row, 2, tract.population)?;
        for (c, value) in tract.demographics.iter().enumerate() {
            sheet.write_number(out_row, 3 + c as u16, *value)?;
        }
        out_row += 1;
    }

    let output_path = "sample_enviroscreen.xlsx";
    workbook.save(output_path)?;

    println!(
        "Wrote {} tracts across {} counties to {output_path} ({} without a demographic profile)",
        tracts.len(),
        COUNTIES.len(),
        skipped
    );
    Ok(())
}
