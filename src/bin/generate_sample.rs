//! Write a synthetic Ames-like dataset.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]` where OUTPUT ends in `.csv`,
//! `.parquet` or `.db` (default `houses.db`, 1500 rows).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use house_finder::data::export::{export_csv, export_parquet};
use house_finder::data::model::HouseRecord;
use house_finder::data::sqlite::SqliteStore;
use house_finder::geo::DEFAULT_CENTER;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// (name, price multiplier, typical build year)
const NEIGHBORHOODS: &[(&str, f64, i32)] = &[
    ("NAmes", 0.95, 1962),
    ("CollgCr", 1.10, 1998),
    ("OldTown", 0.75, 1925),
    ("Edwards", 0.80, 1958),
    ("Somerst", 1.25, 2004),
    ("NridgHt", 1.55, 2006),
    ("Gilbert", 1.05, 2000),
    ("Sawyer", 0.85, 1966),
    ("NWAmes", 1.05, 1977),
    ("BrkSide", 0.72, 1930),
    ("Crawfor", 1.10, 1940),
    ("Mitchel", 0.90, 1975),
];

/// Uniform sample plus a small triangular bump around zero.
fn noise(rng: &mut StdRng, scale: f64) -> f64 {
    (rng.random::<f64>() + rng.random::<f64>() - 1.0) * scale
}

fn generate_record(rng: &mut StdRng, with_coordinates: bool) -> HouseRecord {
    let (name, multiplier, typical_year) =
        NEIGHBORHOODS[rng.random_range(0..NEIGHBORHOODS.len())];

    let year_built = (typical_year + rng.random_range(-15..=15)).clamp(1872, 2010);
    let overall_quality: u8 = (((year_built - 1870) as f64 / 140.0 * 5.0) as i32
        + rng.random_range(2..=5))
    .clamp(1, 10) as u8;
    let living_area: u32 = (900.0 + overall_quality as f64 * 120.0 + noise(rng, 500.0)).max(400.0) as u32;
    let bedrooms_above_grade = (living_area / 550).clamp(1, 5) + rng.random_range(0..=1);
    let garage_capacity: u32 = if year_built < 1940 {
        rng.random_range(0..=1)
    } else {
        rng.random_range(1..=3)
    };
    let lot_area: u32 = rng.random_range(3000..=20_000);

    let base = 25_000.0
        + living_area as f64 * 55.0
        + overall_quality as f64 * 9_000.0
        + (year_built - 1870) as f64 * 350.0
        + garage_capacity as f64 * 6_000.0
        + lot_area as f64 * 1.2;
    let sale_price = ((base * multiplier + noise(rng, 25_000.0)).max(35_000.0) / 100.0).round() as u32 * 100;

    let (latitude, longitude) = if with_coordinates {
        (
            Some(DEFAULT_CENTER.0 + noise(rng, 0.03)),
            Some(DEFAULT_CENTER.1 + noise(rng, 0.03)),
        )
    } else {
        (None, None)
    };

    HouseRecord {
        sale_price,
        living_area,
        bedrooms_above_grade,
        year_built,
        garage_capacity,
        lot_area,
        overall_quality,
        neighborhood: name.to_string(),
        latitude,
        longitude,
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "houses.db".to_string()));
    let rows: usize = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("Invalid row count: {raw}"))?,
        None => 1500,
    };

    let mut rng = StdRng::seed_from_u64(42);
    // Roughly one listing in ten carries surveyed coordinates.
    let records: Vec<HouseRecord> = (0..rows)
        .map(|i| generate_record(&mut rng, i % 10 == 0))
        .collect();

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => export_csv(&records, &output)?,
        "parquet" | "pq" => export_parquet(&records, &output)?,
        "db" | "sqlite" | "sqlite3" => {
            let mut store = SqliteStore::open(&output)?;
            store.replace_all(&records)?;
        }
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} listings to {}", records.len(), output.display());
    Ok(())
}
