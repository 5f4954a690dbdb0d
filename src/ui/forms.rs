use eframe::egui::{self, Color32, RichText, Ui};
use house_finder::i18n::MessageKey;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// New listing
// ---------------------------------------------------------------------------

pub fn listing_form(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.t(MessageKey::NewListing));

    if !state.dataset_available() {
        ui.label(RichText::new(state.t(MessageKey::DatasetUnavailable)).color(Color32::RED));
        return;
    }

    let submit = state.t(MessageKey::Submit);
    let labels = [
        state.t(MessageKey::SalePrice),
        state.t(MessageKey::LivingArea),
        state.t(MessageKey::Bedrooms),
        state.t(MessageKey::YearBuilt),
        state.t(MessageKey::GarageCars),
        state.t(MessageKey::LotArea),
        state.t(MessageKey::MinQuality),
        state.t(MessageKey::Neighborhood),
    ];
    let mut submitted = false;

    egui::Grid::new("listing_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            let draft = &mut state.listing;

            ui.label(labels[0]);
            ui.add(egui::DragValue::new(&mut draft.sale_price).range(50_000..=1_000_000).speed(1000));
            ui.end_row();

            ui.label(labels[1]);
            ui.add(egui::DragValue::new(&mut draft.living_area).range(500..=5000).speed(10));
            ui.end_row();

            ui.label(labels[2]);
            egui::ComboBox::from_id_salt("listing_beds")
                .selected_text(draft.bedrooms_above_grade.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for beds in 1..=5u32 {
                        ui.selectable_value(&mut draft.bedrooms_above_grade, beds, beds.to_string());
                    }
                });
            ui.end_row();

            ui.label(labels[3]);
            ui.add(egui::DragValue::new(&mut draft.year_built).range(1900..=2025));
            ui.end_row();

            ui.label(labels[4]);
            egui::ComboBox::from_id_salt("listing_garage")
                .selected_text(draft.garage_capacity.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for cars in 0..=3u32 {
                        ui.selectable_value(&mut draft.garage_capacity, cars, cars.to_string());
                    }
                });
            ui.end_row();

            ui.label(labels[5]);
            ui.add(egui::DragValue::new(&mut draft.lot_area).range(1000..=20_000).speed(50));
            ui.end_row();

            ui.label(labels[6]);
            ui.add(egui::Slider::new(&mut draft.overall_quality, 1..=10));
            ui.end_row();

            ui.label(labels[7]);
            ui.text_edit_singleline(&mut draft.neighborhood);
            ui.end_row();

            ui.label("");
            if ui.button(submit).clicked() {
                submitted = true;
            }
            ui.end_row();
        });

    if submitted {
        state.submit_listing();
    }
}

// ---------------------------------------------------------------------------
// Price estimate
// ---------------------------------------------------------------------------

pub fn estimate_form(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.t(MessageKey::Estimate));

    // Same order as the model features.
    let features = [
        state.t(MessageKey::LivingArea),
        state.t(MessageKey::Bedrooms),
        state.t(MessageKey::YearBuilt),
        state.t(MessageKey::GarageCars),
        state.t(MessageKey::LotArea),
        state.t(MessageKey::MinQuality),
    ];
    let estimate_label = state.t(MessageKey::Estimate);
    let retrain_label = state.t(MessageKey::Retrain);
    let mut run = false;
    let mut retrain = false;

    egui::Grid::new("estimate_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            let req = &mut state.prediction;

            ui.label(features[0]);
            ui.add(egui::DragValue::new(&mut req.living_area).range(300.0..=6000.0).speed(10.0));
            ui.end_row();

            ui.label(features[1]);
            ui.add(egui::DragValue::new(&mut req.bedrooms_above_grade).range(0.0..=8.0));
            ui.end_row();

            ui.label(features[2]);
            ui.add(egui::DragValue::new(&mut req.year_built).range(1870.0..=2025.0));
            ui.end_row();

            ui.label(features[3]);
            ui.add(egui::DragValue::new(&mut req.garage_capacity).range(0.0..=5.0));
            ui.end_row();

            ui.label(features[4]);
            ui.add(egui::DragValue::new(&mut req.lot_area).range(1000.0..=50_000.0).speed(50.0));
            ui.end_row();

            ui.label(features[5]);
            ui.add(egui::Slider::new(&mut req.overall_quality, 1.0..=10.0).step_by(1.0));
            ui.end_row();
        });

    ui.horizontal(|ui: &mut Ui| {
        run = ui.button(estimate_label).clicked();
        retrain = ui.button(retrain_label).clicked();
    });

    if run {
        state.run_estimate();
    } else if retrain {
        state.retrain();
    }

    if let Some(price) = state.estimate {
        ui.add_space(8.0);
        ui.label(
            RichText::new(format!("{}: ${price:.0}", state.t(MessageKey::EstimatedPrice)))
                .size(20.0)
                .strong(),
        );
        if let Some(model) = state.ctx.model() {
            ui.label(format!("{}: {}", state.t(MessageKey::ModelSamples), model.samples));
        }
    }
}
