use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{HouseError, HouseResult};

// ---------------------------------------------------------------------------
// Column names – kept byte-exact so files and tables round-trip
// ---------------------------------------------------------------------------

pub const COL_SALE_PRICE: &str = "SalePrice";
pub const COL_LIVING_AREA: &str = "Gr Liv Area";
pub const COL_BEDROOMS: &str = "Bedroom AbvGr";
pub const COL_YEAR_BUILT: &str = "Year Built";
pub const COL_GARAGE: &str = "Garage Cars";
pub const COL_LOT_AREA: &str = "Lot Area";
pub const COL_QUALITY: &str = "Overall Qual";
pub const COL_NEIGHBORHOOD: &str = "Neighborhood";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

/// Columns every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_SALE_PRICE,
    COL_LIVING_AREA,
    COL_BEDROOMS,
    COL_YEAR_BUILT,
    COL_GARAGE,
    COL_LOT_AREA,
    COL_QUALITY,
    COL_NEIGHBORHOOD,
];

/// Full column order used for export and for the relational table.
pub const ALL_COLUMNS: [&str; 10] = [
    COL_SALE_PRICE,
    COL_LIVING_AREA,
    COL_BEDROOMS,
    COL_YEAR_BUILT,
    COL_GARAGE,
    COL_LOT_AREA,
    COL_QUALITY,
    COL_NEIGHBORHOOD,
    COL_LATITUDE,
    COL_LONGITUDE,
];

pub const MIN_YEAR_BUILT: i32 = 1800;
pub const MAX_YEAR_BUILT: i32 = 2100;

// ---------------------------------------------------------------------------
// HouseRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single housing listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    #[serde(rename = "SalePrice")]
    pub sale_price: u32,
    #[serde(rename = "Gr Liv Area")]
    pub living_area: u32,
    #[serde(rename = "Bedroom AbvGr")]
    pub bedrooms_above_grade: u32,
    #[serde(rename = "Year Built")]
    pub year_built: i32,
    #[serde(rename = "Garage Cars")]
    pub garage_capacity: u32,
    #[serde(rename = "Lot Area")]
    pub lot_area: u32,
    #[serde(rename = "Overall Qual")]
    pub overall_quality: u8,
    #[serde(rename = "Neighborhood")]
    pub neighborhood: String,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<f64>,
}

impl HouseRecord {
    /// Check the record invariants: positive price, quality in 1..=10 and a
    /// plausible construction year.
    pub fn validate(&self) -> HouseResult<()> {
        if self.sale_price == 0 {
            return Err(HouseError::InvalidRecord(
                "sale price must be positive".to_string(),
            ));
        }
        if !(1..=10).contains(&self.overall_quality) {
            return Err(HouseError::InvalidRecord(format!(
                "overall quality {} outside 1..=10",
                self.overall_quality
            )));
        }
        if !(MIN_YEAR_BUILT..=MAX_YEAR_BUILT).contains(&self.year_built) {
            return Err(HouseError::InvalidRecord(format!(
                "year built {} outside {MIN_YEAR_BUILT}..={MAX_YEAR_BUILT}",
                self.year_built
            )));
        }
        if self.neighborhood.trim().is_empty() {
            return Err(HouseError::InvalidRecord(
                "neighborhood must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Explicit coordinates, when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// HouseDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All loaded records plus the sorted set of neighborhoods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HouseDataset {
    pub records: Vec<HouseRecord>,
    pub neighborhoods: BTreeSet<String>,
}

impl HouseDataset {
    pub fn from_records(records: Vec<HouseRecord>) -> Self {
        let neighborhoods = records.iter().map(|r| r.neighborhood.clone()).collect();
        HouseDataset {
            records,
            neighborhoods,
        }
    }

    /// Add one record at the end, keeping the neighborhood index current.
    pub fn push(&mut self, record: HouseRecord) {
        self.neighborhoods.insert(record.neighborhood.clone());
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(price: u32, year: i32, quality: u8, neighborhood: &str) -> HouseRecord {
        HouseRecord {
            sale_price: price,
            living_area: 1500,
            bedrooms_above_grade: 3,
            year_built: year,
            garage_capacity: 2,
            lot_area: 8000,
            overall_quality: quality,
            neighborhood: neighborhood.to_string(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn validate_rejects_zero_price() {
        let r = record(0, 2000, 5, "NAmes");
        assert!(matches!(r.validate(), Err(HouseError::InvalidRecord(_))));
    }

    #[test]
    fn validate_rejects_quality_out_of_range() {
        assert!(record(100_000, 2000, 0, "NAmes").validate().is_err());
        assert!(record(100_000, 2000, 11, "NAmes").validate().is_err());
        assert!(record(100_000, 2000, 10, "NAmes").validate().is_ok());
    }

    #[test]
    fn validate_rejects_ancient_year() {
        assert!(record(100_000, 1700, 5, "NAmes").validate().is_err());
    }

    #[test]
    fn coordinates_need_both_axes() {
        let mut r = record(100_000, 2000, 5, "NAmes");
        r.latitude = Some(42.0);
        assert_eq!(r.coordinates(), None);
        r.longitude = Some(-93.6);
        assert_eq!(r.coordinates(), Some((42.0, -93.6)));
    }

    #[test]
    fn dataset_tracks_neighborhoods() {
        let mut ds = HouseDataset::from_records(vec![
            record(1, 2000, 5, "OldTown"),
            record(2, 2000, 5, "CollgCr"),
            record(3, 2000, 5, "OldTown"),
        ]);
        assert_eq!(ds.neighborhoods.len(), 2);
        ds.push(record(4, 2001, 6, "Edwards"));
        assert_eq!(ds.len(), 4);
        assert!(ds.neighborhoods.contains("Edwards"));
    }
}
