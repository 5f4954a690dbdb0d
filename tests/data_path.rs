//! End-to-end checks of load → filter → export and load → estimate.

use std::path::Path;

use house_finder::config::AppConfig;
use house_finder::data::export::{read_csv, write_csv};
use house_finder::data::filter::filter;
use house_finder::data::sqlite::SqliteStore;
use house_finder::geo::GeoAnnotator;
use house_finder::{
    AppContext, DatasetState, FilterCriteria, HouseError, HouseRecord, PredictionRequest,
};

fn house(price: u32, year: i32, quality: u8, beds: u32, garage: u32, neighborhood: &str) -> HouseRecord {
    HouseRecord {
        sale_price: price,
        living_area: 900 + beds * 350,
        bedrooms_above_grade: beds,
        year_built: year,
        garage_capacity: garage,
        lot_area: 6000 + garage * 1500,
        overall_quality: quality,
        neighborhood: neighborhood.to_string(),
        latitude: None,
        longitude: None,
    }
}

fn listings() -> Vec<HouseRecord> {
    vec![
        house(129_500, 1961, 5, 3, 1, "NAmes"),
        house(215_000, 2005, 7, 3, 2, "CollgCr"),
        house(189_900, 2001, 6, 3, 2, "Gilbert"),
        house(380_000, 2009, 9, 4, 3, "NridgHt"),
        house(105_000, 1923, 4, 2, 0, "OldTown"),
        house(241_500, 2007, 8, 3, 2, "Somerst"),
        house(142_000, 2003, 6, 2, 1, "Edwards"),
        house(199_000, 2010, 7, 3, 2, "Timber"),
    ]
}

fn sqlite_config(dir: &Path, records: &[HouseRecord]) -> AppConfig {
    let dataset_path = dir.join("houses.db");
    let mut store = SqliteStore::open(&dataset_path).unwrap();
    store.replace_all(records).unwrap();
    AppConfig {
        dataset_path,
        model_path: dir.join("house_price_model.json"),
        ..AppConfig::default()
    }
}

#[test]
fn filtered_export_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = AppContext::new(sqlite_config(dir.path(), &listings()));
    ctx.load_dataset().unwrap();

    let criteria = FilterCriteria {
        max_price: 300_000,
        min_year: 2000,
        min_quality: 6,
        ..FilterCriteria::default()
    };
    let matched = ctx.filter(&criteria).unwrap();
    let names: Vec<&str> = matched.iter().map(|r| r.neighborhood.as_str()).collect();
    assert_eq!(names, vec!["CollgCr", "Gilbert", "Somerst", "Edwards", "Timber"]);

    let mut buf = Vec::new();
    write_csv(&matched, &mut buf).unwrap();
    assert_eq!(read_csv(buf.as_slice()).unwrap(), matched);
}

#[test]
fn sql_and_memory_filters_agree_on_optional_clauses() {
    let dir = tempfile::tempdir().unwrap();
    let records = listings();
    let cfg = sqlite_config(dir.path(), &records);
    let store = SqliteStore::open(&cfg.dataset_path).unwrap();

    let criteria = FilterCriteria {
        max_price: 500_000,
        min_year: 1900,
        min_quality: 1,
        exact_bedrooms: Some(3),
        exact_garage: Some(2),
        min_lot_area: None,
    };
    let from_sql = store.select_filtered(&criteria).unwrap();
    assert_eq!(from_sql, filter(&records, &criteria));
    assert_eq!(from_sql.len(), 4);
}

#[test]
fn new_listing_is_visible_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = sqlite_config(dir.path(), &listings());
    let mut ctx = AppContext::new(cfg.clone());
    ctx.load_dataset().unwrap();
    ctx.append_listing(house(250_000, 2012, 8, 4, 2, "CollgCr"))
        .unwrap();

    let mut fresh = AppContext::new(cfg);
    let ds = fresh.load_dataset().unwrap();
    assert_eq!(ds.len(), listings().len() + 1);
    assert_eq!(ds.records.last().map(|r| r.year_built), Some(2012));
}

#[test]
fn estimate_on_constant_prices_is_constant() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<HouseRecord> = listings()
        .into_iter()
        .map(|r| HouseRecord {
            sale_price: 200_000,
            ..r
        })
        .collect();
    let mut ctx = AppContext::new(sqlite_config(dir.path(), &records));
    ctx.load_dataset().unwrap();

    let far_out = PredictionRequest {
        living_area: 9_000.0,
        bedrooms_above_grade: 7.0,
        year_built: 1850.0,
        garage_capacity: 5.0,
        lot_area: 100_000.0,
        overall_quality: 10.0,
    };
    for req in [PredictionRequest::default(), far_out] {
        let price = ctx.estimate(&req).unwrap();
        assert!((price - 200_000.0).abs() < 1e-6, "{price}");
    }
}

#[test]
fn empty_store_without_artifact_cannot_estimate() {
    let dir = tempfile::tempdir().unwrap();
    let mut ctx = AppContext::new(sqlite_config(dir.path(), &[]));
    assert!(ctx.load_dataset().unwrap().is_empty());
    assert!(matches!(
        ctx.estimate(&PredictionRequest::default()),
        Err(HouseError::ModelUnavailable(_))
    ));
}

#[test]
fn missing_database_is_flagged_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AppConfig {
        dataset_path: dir.path().join("nothing.db"),
        model_path: dir.path().join("model.json"),
        ..AppConfig::default()
    };
    let mut ctx = AppContext::new(cfg);
    assert!(ctx.load_dataset().is_err());
    assert!(matches!(ctx.dataset_state(), DatasetState::Unavailable(_)));
    assert!(ctx.records().is_empty());
    assert!(!dir.path().join("nothing.db").exists());
}

#[test]
fn neighborhood_placement_is_stable() {
    let first = GeoAnnotator::default().coordinate("CollgCr");
    let second = GeoAnnotator::default().coordinate("CollgCr");
    assert_eq!(first, second);
}
