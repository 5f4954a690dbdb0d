//! Process-wide state owned explicitly: the dataset, the store it came from
//! and the cached price model.

use crate::config::AppConfig;
use crate::data::filter::{filter, FilterCriteria};
use crate::data::model::{HouseDataset, HouseRecord};
use crate::data::store::{open_store, DatasetStore};
use crate::error::{HouseError, HouseResult};
use crate::geo::GeoAnnotator;
use crate::regression::{ensure_model, PredictionRequest, TrainedModel};

/// Lifecycle of the in-memory dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetState {
    NotLoaded,
    Loaded(HouseDataset),
    /// Load failed; the app keeps running with no rows.
    Unavailable(HouseError),
}

pub struct AppContext {
    config: AppConfig,
    store: Option<Box<dyn DatasetStore>>,
    dataset: DatasetState,
    model: Option<TrainedModel>,
    geo: GeoAnnotator,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let geo = GeoAnnotator::new(config.center);
        Self {
            config,
            store: None,
            dataset: DatasetState::NotLoaded,
            model: None,
            geo,
        }
    }

    /// Use an already opened store instead of the configured path.
    pub fn with_store(config: AppConfig, store: Box<dyn DatasetStore>) -> Self {
        let mut ctx = Self::new(config);
        ctx.store = Some(store);
        ctx
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn geo(&self) -> &GeoAnnotator {
        &self.geo
    }

    pub fn dataset_state(&self) -> &DatasetState {
        &self.dataset
    }

    /// Rows of the loaded dataset; empty when not loaded or unavailable.
    pub fn records(&self) -> &[HouseRecord] {
        match &self.dataset {
            DatasetState::Loaded(ds) => &ds.records,
            _ => &[],
        }
    }

    pub fn dataset(&self) -> Option<&HouseDataset> {
        match &self.dataset {
            DatasetState::Loaded(ds) => Some(ds),
            _ => None,
        }
    }

    /// Load the dataset once.  Later calls return the cached result,
    /// including a cached failure; use [`Self::reload_dataset`] to retry.
    pub fn load_dataset(&mut self) -> HouseResult<&HouseDataset> {
        if matches!(self.dataset, DatasetState::NotLoaded) {
            self.dataset = match self.read_store() {
                Ok(ds) => {
                    log::info!(
                        "Loaded {} records from {}",
                        ds.len(),
                        self.config.dataset_path.display()
                    );
                    DatasetState::Loaded(ds)
                }
                Err(e) => {
                    log::error!("{e}");
                    DatasetState::Unavailable(e)
                }
            };
        }
        match &self.dataset {
            DatasetState::Loaded(ds) => Ok(ds),
            DatasetState::Unavailable(e) => Err(e.clone()),
            DatasetState::NotLoaded => Err(HouseError::DatasetUnavailable {
                path: self.config.dataset_path.clone(),
                reason: "dataset not loaded".to_string(),
            }),
        }
    }

    /// Drop the cached dataset and read it again.
    pub fn reload_dataset(&mut self) -> HouseResult<&HouseDataset> {
        self.dataset = DatasetState::NotLoaded;
        self.load_dataset()
    }

    /// Point the context at another dataset file and load it.
    pub fn switch_dataset(&mut self, path: std::path::PathBuf) -> HouseResult<&HouseDataset> {
        self.config.dataset_path = path;
        self.store = None;
        self.reload_dataset()
    }

    fn read_store(&mut self) -> HouseResult<HouseDataset> {
        let store = match &mut self.store {
            Some(store) => store,
            empty => empty.insert(open_store(&self.config.dataset_path)?),
        };
        store.load()
    }

    /// Run the filter over the loaded dataset.  An empty vector means
    /// "0 results"; a missing dataset is an error.
    pub fn filter(&self, criteria: &FilterCriteria) -> HouseResult<Vec<HouseRecord>> {
        match &self.dataset {
            DatasetState::Loaded(ds) => {
                let out = filter(&ds.records, criteria);
                let clauses: Vec<String> =
                    criteria.active_clauses().iter().map(|c| c.to_string()).collect();
                log::debug!("filter [{}] -> {} rows", clauses.join(" AND "), out.len());
                Ok(out)
            }
            DatasetState::Unavailable(e) => Err(e.clone()),
            DatasetState::NotLoaded => Err(HouseError::DatasetUnavailable {
                path: self.config.dataset_path.clone(),
                reason: "dataset not loaded".to_string(),
            }),
        }
    }

    /// Validate, persist and keep a new listing.  The cached model is not
    /// refit.
    pub fn append_listing(&mut self, record: HouseRecord) -> HouseResult<()> {
        record.validate()?;
        let DatasetState::Loaded(ds) = &mut self.dataset else {
            return Err(HouseError::DatasetUnavailable {
                path: self.config.dataset_path.clone(),
                reason: "cannot add a listing without a loaded dataset".to_string(),
            });
        };
        let Some(store) = self.store.as_mut() else {
            return Err(HouseError::Storage("no store open".to_string()));
        };
        store.append(&record)?;
        log::info!(
            "Added listing in {} for ${} to {}",
            record.neighborhood,
            record.sale_price,
            store.location().display()
        );
        ds.push(record);
        Ok(())
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Return the cached model, loading or fitting it on first use.
    pub fn ensure_model(&mut self) -> HouseResult<&TrainedModel> {
        if self.model.is_none() {
            let model = ensure_model(&self.config.model_path, self.records())?;
            self.model = Some(model);
        }
        self.model
            .as_ref()
            .ok_or_else(|| HouseError::ModelUnavailable("model not initialized".to_string()))
    }

    /// Predict with the cached model only.
    pub fn predict(&self, request: &PredictionRequest) -> HouseResult<f64> {
        self.model
            .as_ref()
            .ok_or_else(|| HouseError::ModelUnavailable("no model loaded".to_string()))?
            .predict(request)
    }

    /// Ensure the model, then predict.
    pub fn estimate(&mut self, request: &PredictionRequest) -> HouseResult<f64> {
        self.ensure_model()?;
        self.predict(request)
    }

    /// Forget the cached model and delete its artifact so the next estimate
    /// refits on the current data.
    pub fn reset_model(&mut self) -> HouseResult<()> {
        self.model = None;
        let path = &self.config.model_path;
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| {
                HouseError::Storage(format!("removing {}: {e}", path.display()))
            })?;
            log::info!("Deleted model artifact {}", path.display());
        }
        Ok(())
    }
}
