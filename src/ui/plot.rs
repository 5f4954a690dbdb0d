use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};
use house_finder::data::stats::average_price_by_neighborhood;
use house_finder::i18n::MessageKey;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Map (central panel, results tab)
// ---------------------------------------------------------------------------

/// Scatter the visible listings by longitude / latitude, one series per
/// neighborhood.
pub fn map_plot(ui: &mut Ui, state: &AppState) {
    ui.heading(state.t(MessageKey::MapView));

    if state.visible_indices.is_empty() {
        ui.label(state.t(MessageKey::NoResults));
        return;
    }

    let geo = state.ctx.geo();
    let mut by_neighborhood: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for record in state.visible_records() {
        let (lat, lon) = geo.locate(record);
        by_neighborhood
            .entry(record.neighborhood.as_str())
            .or_default()
            .push([lon, lat]);
    }

    Plot::new("map_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (name, coords) in by_neighborhood {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(name))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points = Points::new(coords.into_iter().collect::<PlotPoints>())
                    .name(name)
                    .color(color)
                    .radius(4.0);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Admin: average price per neighborhood
// ---------------------------------------------------------------------------

pub fn average_price_chart(ui: &mut Ui, state: &AppState) {
    ui.heading(state.t(MessageKey::AveragePriceByNeighborhood));

    let averages = average_price_by_neighborhood(state.ctx.records());
    if averages.is_empty() {
        ui.label(state.t(MessageKey::NoResults));
        return;
    }

    let bars: Vec<Bar> = averages
        .iter()
        .enumerate()
        .map(|(i, (name, avg))| {
            let color = state
                .color_map
                .as_ref()
                .map(|cm| cm.color_for(name))
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new(i as f64, *avg).name(name).fill(color)
        })
        .collect();
    let names: Vec<String> = averages.into_iter().map(|(name, _)| name).collect();

    Plot::new("avg_price_chart")
        .height(300.0)
        .y_axis_label("Mean SalePrice")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            names.get(i as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.7));
        });
}
