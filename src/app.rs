use eframe::egui;
use house_finder::config::AppConfig;

use crate::state::{AppState, Tab};
use crate::ui::{forms, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HouseFinderApp {
    pub state: AppState,
}

impl HouseFinderApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for HouseFinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tab_bar(ui, &mut self.state);
            ui.separator();
            match self.state.tab {
                Tab::Results => {
                    table::results_table(ui, &self.state);
                    ui.separator();
                    plot::map_plot(ui, &self.state);
                }
                Tab::Admin => {
                    plot::average_price_chart(ui, &self.state);
                    ui.separator();
                    table::newest_table(ui, &self.state);
                }
                Tab::NewListing => forms::listing_form(ui, &mut self.state),
                Tab::Estimate => forms::estimate_form(ui, &mut self.state),
            }
        });
    }
}
