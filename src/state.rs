use std::path::Path;

use house_finder::config::AppConfig;
use house_finder::context::{AppContext, DatasetState};
use house_finder::data::export::{export_csv, export_parquet};
use house_finder::data::filter::{filtered_indices, FilterCriteria};
use house_finder::data::model::HouseRecord;
use house_finder::i18n::{tr, Locale, MessageKey};
use house_finder::regression::PredictionRequest;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Results,
    Admin,
    NewListing,
    Estimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Dataset, store and model.
    pub ctx: AppContext,

    /// Current filter thresholds.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Neighborhood colours for the map.
    pub color_map: Option<ColorMap>,

    pub locale: Locale,

    pub tab: Tab,

    /// Draft of the new-listing form.
    pub listing: HouseRecord,

    /// Inputs of the estimate form.
    pub prediction: PredictionRequest,

    /// Last estimate, if any.
    pub estimate: Option<f64>,

    /// Error notice shown in the UI.
    pub status_message: Option<String>,

    /// Success notice shown in the UI.
    pub info_message: Option<String>,
}

fn default_listing() -> HouseRecord {
    HouseRecord {
        sale_price: 250_000,
        living_area: 1500,
        bedrooms_above_grade: 3,
        year_built: 2005,
        garage_capacity: 2,
        lot_area: 7000,
        overall_quality: 6,
        neighborhood: "CollgCr".to_string(),
        latitude: None,
        longitude: None,
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let locale = config.locale;
        let mut state = Self {
            ctx: AppContext::new(config),
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            color_map: None,
            locale,
            tab: Tab::Results,
            listing: default_listing(),
            prediction: PredictionRequest::default(),
            estimate: None,
            status_message: None,
            info_message: None,
        };
        state.load();
        state
    }

    pub fn t(&self, key: MessageKey) -> &'static str {
        tr(self.locale, key)
    }

    fn load(&mut self) {
        match self.ctx.load_dataset() {
            Ok(_) => self.status_message = None,
            Err(e) => {
                self.status_message =
                    Some(format!("{}: {e}", tr(self.locale, MessageKey::DatasetUnavailable)))
            }
        }
        self.after_dataset_change();
    }

    fn after_dataset_change(&mut self) {
        self.color_map = self
            .ctx
            .dataset()
            .map(|ds| ColorMap::new(&ds.neighborhoods));
        self.refilter();
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(self.ctx.records(), &self.criteria);
    }

    /// Records currently passing the filters, in dataset order.
    pub fn visible_records(&self) -> impl Iterator<Item = &HouseRecord> {
        let records = self.ctx.records();
        self.visible_indices.iter().map(move |&i| &records[i])
    }

    pub fn dataset_available(&self) -> bool {
        matches!(self.ctx.dataset_state(), DatasetState::Loaded(_))
    }

    /// Switch to another dataset file.
    pub fn open_dataset(&mut self, path: &Path) {
        match self.ctx.switch_dataset(path.to_path_buf()) {
            Ok(ds) => {
                log::info!("Loaded {} records from {}", ds.len(), path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message =
                    Some(format!("{}: {e}", tr(self.locale, MessageKey::DatasetUnavailable)));
            }
        }
        self.after_dataset_change();
    }

    /// Submit the new-listing form.
    pub fn submit_listing(&mut self) {
        match self.ctx.append_listing(self.listing.clone()) {
            Ok(()) => {
                self.info_message = Some(self.t(MessageKey::ListingAdded).to_string());
                self.status_message = None;
                self.listing = default_listing();
                self.after_dataset_change();
            }
            Err(e) => {
                log::error!("Failed to add listing: {e}");
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn run_estimate(&mut self) {
        match self.ctx.estimate(&self.prediction) {
            Ok(price) => {
                self.estimate = Some(price);
                self.status_message = None;
            }
            Err(e) => {
                self.estimate = None;
                self.status_message =
                    Some(format!("{}: {e}", tr(self.locale, MessageKey::ModelUnavailable)));
            }
        }
    }

    pub fn retrain(&mut self) {
        if let Err(e) = self.ctx.reset_model() {
            self.status_message = Some(e.to_string());
            return;
        }
        self.run_estimate();
    }

    /// Write the visible records to `path`.
    pub fn export(&mut self, path: &Path, format: ExportFormat) {
        let records: Vec<HouseRecord> = self.visible_records().cloned().collect();
        let result = match format {
            ExportFormat::Csv => export_csv(&records, path),
            ExportFormat::Parquet => export_parquet(&records, path),
        };
        match result {
            Ok(()) => {
                self.info_message = Some(format!(
                    "{}: {} ({})",
                    tr(self.locale, MessageKey::ExportedRows),
                    records.len(),
                    path.display()
                ))
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message =
                    Some(format!("{}: {e:#}", tr(self.locale, MessageKey::ExportFailed)));
            }
        }
    }
}
