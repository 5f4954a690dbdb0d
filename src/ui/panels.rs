use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use house_finder::i18n::{Locale, MessageKey};

use crate::state::{AppState, ExportFormat, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Selector for an optional exact-match filter.  `None` shows as "Any".
fn optional_choice(ui: &mut Ui, id: &str, value: &mut Option<u32>, choices: &[u32], any: &str) -> bool {
    let mut changed = false;
    let selected_text = value.map_or_else(|| any.to_string(), |v| v.to_string());
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            changed |= ui.selectable_value(value, None, any).changed();
            for &choice in choices {
                changed |= ui
                    .selectable_value(value, Some(choice), choice.to_string())
                    .changed();
            }
        });
    changed
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.t(MessageKey::FilterHeading));
    ui.separator();

    if !state.dataset_available() {
        ui.label(RichText::new(state.t(MessageKey::DatasetUnavailable)).color(Color32::RED));
        return;
    }

    let any = state.t(MessageKey::Any);
    let labels = [
        state.t(MessageKey::MaxBudget),
        state.t(MessageKey::MinYearBuilt),
        state.t(MessageKey::MinQuality),
        state.t(MessageKey::Bedrooms),
        state.t(MessageKey::GarageCars),
        state.t(MessageKey::MinLotArea),
    ];
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let criteria = &mut state.criteria;

            ui.strong(labels[0]);
            changed |= ui
                .add(egui::Slider::new(&mut criteria.max_price, 50_000..=1_000_000).step_by(10_000.0))
                .changed();

            ui.strong(labels[1]);
            changed |= ui
                .add(egui::Slider::new(&mut criteria.min_year, 1900..=2025))
                .changed();

            ui.strong(labels[2]);
            changed |= ui
                .add(egui::Slider::new(&mut criteria.min_quality, 1..=10))
                .changed();

            ui.separator();

            ui.strong(labels[3]);
            changed |= optional_choice(ui, "bedrooms", &mut criteria.exact_bedrooms, &[1, 2, 3, 4, 5], any);

            ui.strong(labels[4]);
            changed |= optional_choice(ui, "garage", &mut criteria.exact_garage, &[0, 1, 2, 3], any);

            ui.strong(labels[5]);
            ui.horizontal(|ui: &mut Ui| {
                let mut enabled = criteria.min_lot_area.is_some();
                if ui.checkbox(&mut enabled, "").changed() {
                    criteria.min_lot_area = enabled.then_some(7000);
                    changed = true;
                }
                match criteria.min_lot_area.as_mut() {
                    Some(lot) => {
                        changed |= ui
                            .add(egui::DragValue::new(lot).range(1000..=50_000).speed(100))
                            .changed();
                    }
                    None => {
                        ui.label(any);
                    }
                }
            });

            ui.separator();
            if ui.button("Reset").clicked() {
                *criteria = Default::default();
                changed = true;
            }
        });

    if changed {
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export CSV…").clicked() {
                export_file_dialog(state, ExportFormat::Csv);
                ui.close_menu();
            }
            if ui.button("Export Parquet…").clicked() {
                export_file_dialog(state, ExportFormat::Parquet);
                ui.close_menu();
            }
        });

        ui.separator();

        egui::ComboBox::from_id_salt("locale")
            .selected_text(state.locale.code())
            .width(50.0)
            .show_ui(ui, |ui: &mut Ui| {
                for locale in Locale::ALL {
                    ui.selectable_value(&mut state.locale, locale, locale.code());
                }
            });

        ui.separator();

        if let Some(ds) = state.ctx.dataset() {
            ui.label(format!(
                "{} / {} {}",
                state.visible_indices.len(),
                ds.len(),
                state.t(MessageKey::ResultsCount)
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        } else if let Some(msg) = &state.info_message {
            ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
        }
    });
}

/// Tab selector for the central panel.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    let labels = [
        (Tab::Results, state.t(MessageKey::FilteredHouses)),
        (Tab::Admin, state.t(MessageKey::AdminPanel)),
        (Tab::NewListing, state.t(MessageKey::NewListing)),
        (Tab::Estimate, state.t(MessageKey::Estimate)),
    ];
    ui.horizontal(|ui: &mut Ui| {
        for (tab, label) in labels {
            ui.selectable_value(&mut state.tab, tab, label);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open housing data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "db", "sqlite", "sqlite3"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("SQLite", &["db", "sqlite", "sqlite3"])
        .pick_file();

    if let Some(path) = file {
        state.open_dataset(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState, format: ExportFormat) {
    let (name, ext) = match format {
        ExportFormat::Csv => ("filtered_houses.csv", "csv"),
        ExportFormat::Parquet => ("filtered_houses.parquet", "parquet"),
    };
    let file = rfd::FileDialog::new()
        .set_title("Export filtered houses")
        .set_file_name(name)
        .add_filter(ext, &[ext])
        .save_file();

    if let Some(path) = file {
        state.export(&path, format);
    }
}
