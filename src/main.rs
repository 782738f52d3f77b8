mod app;
mod chart;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::ExplorerApp;
use eframe::egui;

/// Workbook opened at startup when no path is given on the command line.
const DEFAULT_WORKBOOK: &str = "calenviroscreen40resultsdatadictionary_F_2021.xlsx";

fn main() -> eframe::Result {
    env_logger::init();

    let workbook = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CalEnviroScreen Community Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(workbook)))),
    )
}
