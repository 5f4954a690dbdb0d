mod app;
mod color;
mod state;
mod ui;

use app::HouseFinderApp;
use eframe::egui;
use house_finder::config::AppConfig;
use house_finder::i18n::{tr, MessageKey};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    log::info!("Starting with dataset {}", config.dataset_path.display());
    let title = tr(config.locale, MessageKey::AppTitle);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        title,
        options,
        Box::new(move |_cc| Ok(Box::new(HouseFinderApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
