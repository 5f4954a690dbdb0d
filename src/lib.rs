//! Housing dataset browser: loading, filtering, map placement and price
//! estimates.  The egui front end lives in the `house-finder` binary.

pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod geo;
pub mod i18n;
pub mod regression;

pub use context::{AppContext, DatasetState};
pub use data::filter::FilterCriteria;
pub use data::model::{HouseDataset, HouseRecord};
pub use error::{HouseError, HouseResult};
pub use regression::{PredictionRequest, TrainedModel};
