use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use house_finder::data::model::{HouseRecord, ALL_COLUMNS};
use house_finder::data::stats::newest_listings;
use house_finder::i18n::MessageKey;

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

fn cells(record: &HouseRecord) -> [String; 10] {
    let coord = |v: Option<f64>| v.map(|x| format!("{x:.5}")).unwrap_or_default();
    [
        format!("${}", record.sale_price),
        record.living_area.to_string(),
        record.bedrooms_above_grade.to_string(),
        record.year_built.to_string(),
        record.garage_capacity.to_string(),
        record.lot_area.to_string(),
        record.overall_quality.to_string(),
        record.neighborhood.clone(),
        coord(record.latitude),
        coord(record.longitude),
    ]
}

/// Render records as a striped table with the dataset column names.
fn records_table(ui: &mut Ui, id: &str, records: &[&HouseRecord], max_height: f32) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(max_height)
            .columns(Column::auto().at_least(60.0).resizable(true), ALL_COLUMNS.len())
            .header(20.0, |mut header| {
                for name in ALL_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    let record = records[row.index()];
                    for text in cells(record) {
                        row.col(|ui: &mut Ui| {
                            ui.label(text);
                        });
                    }
                });
            });
    });
}

/// Table of the records passing the current filters.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    ui.heading(state.t(MessageKey::FilteredHouses));

    if !state.dataset_available() {
        ui.label(state.t(MessageKey::DatasetUnavailable));
        return;
    }
    if state.visible_indices.is_empty() {
        ui.label(format!("0 {}", state.t(MessageKey::ResultsCount)));
        ui.label(state.t(MessageKey::NoResults));
        return;
    }

    let records: Vec<&HouseRecord> = state.visible_records().collect();
    records_table(ui, "results_table", &records, 260.0);
}

/// Admin view: the most recently built listings.
pub fn newest_table(ui: &mut Ui, state: &AppState) {
    ui.heading(state.t(MessageKey::NewestListings));
    let newest = newest_listings(state.ctx.records(), 5);
    let records: Vec<&HouseRecord> = newest.iter().collect();
    records_table(ui, "newest_table", &records, 140.0);
}
