//! Map placement for listings.
//!
//! Most datasets carry no coordinates, only a neighborhood code. Those rows
//! are placed at a pseudo-random offset from the city center taken from a
//! SHA-256 digest of the neighborhood name, so the layout is identical across
//! sessions and releases without storing anything.

use sha2::{Digest, Sha256};

use crate::data::model::HouseRecord;

/// Ames, Iowa.
pub const DEFAULT_CENTER: (f64, f64) = (42.0347, -93.62);

/// Maximum offset from the center, in degrees, on each axis.
pub const NEIGHBORHOOD_RADIUS: f64 = 0.02;

/// Fixed shift applied to explicit coordinates.
pub const EXPLICIT_JITTER: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoAnnotator {
    pub center: (f64, f64),
    pub radius: f64,
    pub jitter: f64,
}

impl Default for GeoAnnotator {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER)
    }
}

impl GeoAnnotator {
    pub fn new(center: (f64, f64)) -> Self {
        Self {
            center,
            radius: NEIGHBORHOOD_RADIUS,
            jitter: EXPLICIT_JITTER,
        }
    }

    /// Deterministic `(lat, lon)` for a neighborhood name, within `radius`
    /// of the center.
    pub fn coordinate(&self, neighborhood: &str) -> (f64, f64) {
        let digest = Sha256::digest(neighborhood.as_bytes());
        let (lat_bytes, rest) = digest.split_at(8);
        let dlat = self.offset(lat_bytes);
        let dlon = self.offset(&rest[..8]);
        (self.center.0 + dlat, self.center.1 + dlon)
    }

    /// Map eight digest bytes onto `[-radius, radius)`.
    fn offset(&self, bytes: &[u8]) -> f64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        let unit = (u64::from_le_bytes(word) >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * self.radius
    }

    /// Map position for a record: its own coordinates shifted by `jitter`
    /// when present, otherwise its neighborhood's position.
    pub fn locate(&self, record: &HouseRecord) -> (f64, f64) {
        match record.coordinates() {
            Some((lat, lon)) => (lat + self.jitter, lon + self.jitter),
            None => self.coordinate(&record.neighborhood),
        }
    }
}
