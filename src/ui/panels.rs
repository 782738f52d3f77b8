use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::export;
use crate::data::filter::{FilterCriteria, DEFAULT_COUNTIES};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No workbook loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- County selection ----
            let n_selected = state.criteria.counties.len();
            let n_total = dataset.counties.len();
            let header_text = if n_selected == 0 {
                format!("Counties  (all {n_total})")
            } else {
                format!("Counties  ({n_selected}/{n_total})")
            };

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("counties")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_counties();
                        }
                        if ui.small_button("None").clicked() {
                            state.clear_counties();
                        }
                    });
                    ui.label(
                        RichText::new("An empty selection shows every county.")
                            .weak()
                            .small(),
                    );

                    for county in &dataset.counties {
                        let mut checked = state.criteria.counties.contains(county);
                        if ui.checkbox(&mut checked, county).changed() {
                            state.toggle_county(county);
                        }
                    }
                });

            ui.separator();

            // ---- Percentile window ----
            ui.strong("CES 4.0 percentile range");
            let (mut lo, mut hi) =
                (state.criteria.min_percentile, state.criteria.max_percentile);
            let changed = ui
                .add(
                    egui::Slider::new(&mut lo, 0.0..=100.0)
                        .integer()
                        .text("min"),
                )
                .changed()
                | ui.add(
                    egui::Slider::new(&mut hi, 0.0..=100.0)
                        .integer()
                        .text("max"),
                )
                .changed();
            if changed {
                state.set_percentile_range(lo, hi);
            }
            ui.label(
                RichText::new(
                    "Tracts at or above the 75th percentile are the state's \
                     priority communities.",
                )
                .weak()
                .small(),
            );

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.criteria = FilterCriteria::default_for(&dataset);
                state.refilter();
            }
            ui.label(
                RichText::new(format!(
                    "Defaults: {} at 75-100.",
                    DEFAULT_COUNTIES.join(" and ")
                ))
                .weak()
                .small(),
            );
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open workbook…").clicked() {
                open_workbook_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.load_workbook();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export filtered CSV…").clicked() {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dataset) = &state.dataset {
            ui.label(format!(
                "{} tracts loaded, {} in view",
                dataset.len(),
                state.view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// Load failure screen
// ---------------------------------------------------------------------------

/// Shown instead of the dashboard when the workbook could not be loaded.
/// The File menu stays available so the user can pick another file.
pub fn load_error_screen(ui: &mut Ui, state: &AppState) {
    let Some(error) = &state.load_error else {
        return;
    };
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(ui.available_height() * 0.25);
        ui.heading("Could not load workbook");
        ui.add_space(8.0);
        ui.label(RichText::new(error).monospace());
        ui.add_space(8.0);
        ui.label(format!("Path: {}", state.workbook_path.display()));
        ui.add_space(16.0);
        ui.label("Use File → Open workbook… to choose a different file.");
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_workbook_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CalEnviroScreen workbook")
        .add_filter("Excel workbook", &["xlsx"])
        .pick_file();

    if let Some(path) = file {
        state.load_from(path);
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(export::EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::write_csv_file(&dataset, &state.view, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to '{}'", state.view.len(), path.display());
                state.status_message = Some(format!(
                    "Exported {} tracts to '{}'",
                    state.view.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
