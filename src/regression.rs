//! Price estimation from six numeric features.
//!
//! Fitting is delegated to `smartcore`'s ridge regression over a
//! `DenseMatrix<f64>`. Callers only rely on fit / load / save / predict; the
//! artifact is a single JSON document.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::ridge_regression::{
    RidgeRegression, RidgeRegressionParameters, RidgeRegressionSolverName,
};

use crate::data::model::HouseRecord;
use crate::error::{HouseError, HouseResult};

pub const FEATURE_COUNT: usize = 6;

/// Ridge penalty in standardized feature space.  Keeps the fit solvable when
/// a feature is constant or collinear.
const RIDGE_LAMBDA: f64 = 1e-6;

// ---------------------------------------------------------------------------
// PredictionRequest
// ---------------------------------------------------------------------------

/// The six model inputs.  Values are passed through unchecked; out-of-range
/// inputs extrapolate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub living_area: f64,
    pub bedrooms_above_grade: f64,
    pub year_built: f64,
    pub garage_capacity: f64,
    pub lot_area: f64,
    pub overall_quality: f64,
}

impl Default for PredictionRequest {
    fn default() -> Self {
        Self {
            living_area: 1500.0,
            bedrooms_above_grade: 3.0,
            year_built: 2005.0,
            garage_capacity: 2.0,
            lot_area: 7000.0,
            overall_quality: 6.0,
        }
    }
}

impl PredictionRequest {
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.living_area,
            self.bedrooms_above_grade,
            self.year_built,
            self.garage_capacity,
            self.lot_area,
            self.overall_quality,
        ]
    }
}

impl From<&HouseRecord> for PredictionRequest {
    fn from(r: &HouseRecord) -> Self {
        Self {
            living_area: r.living_area as f64,
            bedrooms_above_grade: r.bedrooms_above_grade as f64,
            year_built: r.year_built as f64,
            garage_capacity: r.garage_capacity as f64,
            lot_area: r.lot_area as f64,
            overall_quality: r.overall_quality as f64,
        }
    }
}

// ---------------------------------------------------------------------------
// TrainedModel
// ---------------------------------------------------------------------------

type Regressor = RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

fn model_error(context: &str, e: impl std::fmt::Display) -> HouseError {
    HouseError::ModelUnavailable(format!("{context}: {e}"))
}

/// Fitted regressor plus the feature scaling it was trained under.
///
/// smartcore's built-in normalization rejects constant columns, so features
/// are standardized here and the target is centered on its mean.  With no
/// more rows than features there is nothing to regress and the model
/// predicts the mean price.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedModel {
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    price_mean: f64,
    regressor: Option<Regressor>,
    /// Number of rows the model was fit on.
    pub samples: usize,
}

impl TrainedModel {
    /// Fit against `(features, sale_price)` pairs drawn from `records`.
    pub fn fit(records: &[HouseRecord]) -> HouseResult<Self> {
        if records.is_empty() {
            return Err(HouseError::ModelUnavailable(
                "no records to fit on".to_string(),
            ));
        }
        let rows: Vec<[f64; FEATURE_COUNT]> = records
            .iter()
            .map(|r| PredictionRequest::from(r).features())
            .collect();
        let n = rows.len() as f64;

        let mut means = [0.0; FEATURE_COUNT];
        for row in &rows {
            for (m, x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut scales = [0.0; FEATURE_COUNT];
        for row in &rows {
            for (j, s) in scales.iter_mut().enumerate() {
                *s += (row[j] - means[j]).powi(2);
            }
        }
        for s in scales.iter_mut() {
            *s = (*s / n).sqrt();
            if *s < f64::EPSILON {
                *s = 1.0;
            }
        }

        let price_mean = records.iter().map(|r| r.sale_price as f64).sum::<f64>() / n;
        let centered: Vec<f64> = records
            .iter()
            .map(|r| r.sale_price as f64 - price_mean)
            .collect();

        let regressor = if rows.len() > FEATURE_COUNT {
            let x = standardize(&rows, &means, &scales)?;
            let params = RidgeRegressionParameters::default()
                .with_alpha(RIDGE_LAMBDA)
                .with_solver(RidgeRegressionSolverName::Cholesky)
                .with_normalize(false);
            let fitted = RidgeRegression::fit(&x, &centered, params)
                .map_err(|e| model_error("fitting", e))?;
            Some(fitted)
        } else {
            log::warn!(
                "Only {} records, price model falls back to the mean",
                records.len()
            );
            None
        };

        log::info!(
            "Fitted price model on {} records (mean price {:.0})",
            records.len(),
            price_mean
        );
        Ok(Self {
            means,
            scales,
            price_mean,
            regressor,
            samples: records.len(),
        })
    }

    /// Estimated sale price for one feature vector.
    pub fn predict(&self, request: &PredictionRequest) -> HouseResult<f64> {
        let Some(regressor) = &self.regressor else {
            return Ok(self.price_mean);
        };
        let x = standardize(&[request.features()], &self.means, &self.scales)?;
        let predictions = regressor
            .predict(&x)
            .map_err(|e| model_error("predicting", e))?;
        predictions
            .first()
            .map(|y| y + self.price_mean)
            .ok_or_else(|| HouseError::ModelUnavailable("no prediction returned".to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("reading model {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file)).context("parsing model artifact")
    }

    /// Write the artifact as one unit: temp file next to the target, then
    /// rename over it.
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        {
            let file =
                File::create(&tmp).with_context(|| format!("writing {}", tmp.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self).context("serializing model")?;
            writer
                .flush()
                .with_context(|| format!("writing {}", tmp.display()))?;
        }
        std::fs::rename(&tmp, path)
            .with_context(|| format!("moving model into place at {}", path.display()))?;
        Ok(())
    }
}

fn standardize(
    rows: &[[f64; FEATURE_COUNT]],
    means: &[f64; FEATURE_COUNT],
    scales: &[f64; FEATURE_COUNT],
) -> HouseResult<DenseMatrix<f64>> {
    let scaled: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| {
            (0..FEATURE_COUNT)
                .map(|j| (row[j] - means[j]) / scales[j])
                .collect()
        })
        .collect();
    DenseMatrix::from_2d_vec(&scaled).map_err(|e| model_error("building feature matrix", e))
}

/// Load the persisted model, or fit one on `records` and persist it.
///
/// An unreadable artifact is treated as absent.  Failing to write a freshly
/// fitted model is logged; the model is still returned.
pub fn ensure_model(path: &Path, records: &[HouseRecord]) -> HouseResult<TrainedModel> {
    if path.exists() {
        match TrainedModel::load(path) {
            Ok(model) => {
                log::info!("Loaded price model from {}", path.display());
                return Ok(model);
            }
            Err(e) => log::warn!("Ignoring unreadable model artifact: {e:#}"),
        }
    }

    if records.is_empty() {
        return Err(HouseError::ModelUnavailable(format!(
            "no model at {} and no data to train on",
            path.display()
        )));
    }

    let model = TrainedModel::fit(records)?;
    match model.save(path) {
        Ok(()) => log::info!("Saved price model to {}", path.display()),
        Err(e) => log::error!("Failed to persist price model: {e:#}"),
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn varied(price: impl Fn(&HouseRecord) -> u32) -> Vec<HouseRecord> {
        (0..25u32)
            .map(|i| {
                let mut r = record(1, 1950 + (i as i32 * 13) % 70, (1 + (i * 7) % 10) as u8, "NAmes");
                r.living_area = 800 + (i * 97) % 2500;
                r.bedrooms_above_grade = 1 + (i * 3) % 5;
                r.garage_capacity = (i * 5) % 4;
                r.lot_area = 4000 + (i * 811) % 15_000;
                r.sale_price = price(&r);
                r
            })
            .collect()
    }

    #[test]
    fn constant_price_predicts_constant() {
        let model = TrainedModel::fit(&varied(|_| 200_000)).unwrap();
        let requests = [
            PredictionRequest::default(),
            PredictionRequest {
                living_area: 12_000.0,
                bedrooms_above_grade: 0.0,
                year_built: 1700.0,
                garage_capacity: 9.0,
                lot_area: 1.0,
                overall_quality: 15.0,
            },
        ];
        for req in requests {
            assert!((model.predict(&req).unwrap() - 200_000.0).abs() < 1e-6);
        }
    }

    #[test]
    fn recovers_linear_relationship() {
        let records = varied(|r| 20_000 + 100 * r.living_area + 5_000 * r.overall_quality as u32);
        let model = TrainedModel::fit(&records).unwrap();
        for r in &records {
            let got = model.predict(&PredictionRequest::from(r)).unwrap();
            assert!((got - r.sale_price as f64).abs() < 1.0, "{got} vs {}", r.sale_price);
        }
        let unseen = PredictionRequest {
            living_area: 2000.0,
            overall_quality: 7.0,
            ..PredictionRequest::default()
        };
        assert!((model.predict(&unseen).unwrap() - 255_000.0).abs() < 5.0);
    }

    #[test]
    fn single_record_fits_intercept_only() {
        let model = TrainedModel::fit(&[record(175_000, 2000, 6, "NAmes")]).unwrap();
        assert!((model.predict(&PredictionRequest::default()).unwrap() - 175_000.0).abs() < 1e-6);
    }

    #[test]
    fn fit_on_empty_is_model_unavailable() {
        assert!(matches!(
            TrainedModel::fit(&[]),
            Err(HouseError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn ensure_model_without_data_or_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ensure_model(&dir.path().join("model.json"), &[]);
        assert!(matches!(result, Err(HouseError::ModelUnavailable(_))));
    }

    #[test]
    fn ensure_model_persists_then_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let records = varied(|r| 50_000 + 80 * r.living_area);

        let fitted = ensure_model(&path, &records).unwrap();
        assert!(path.exists());

        // Reload works without any data.
        let loaded = ensure_model(&path, &[]).unwrap();
        assert_eq!(loaded.samples, fitted.samples);
        let req = PredictionRequest::default();
        assert!((loaded.predict(&req).unwrap() - fitted.predict(&req).unwrap()).abs() < 1e-6);
    }

    #[test]
    fn corrupt_artifact_is_refit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();
        let model = ensure_model(&path, &varied(|_| 123_000)).unwrap();
        assert!((model.predict(&PredictionRequest::default()).unwrap() - 123_000.0).abs() < 1e-6);
        assert!(TrainedModel::load(&path).is_ok());
    }
}
