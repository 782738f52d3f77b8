use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart;
use crate::data::model::Dataset;
use crate::data::summary;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the dashboard in the central panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a workbook to explore communities  (File → Open workbook…)");
        });
        return;
    };
    let view = state.view.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("CalEnviroScreen 4.0 Community Explorer");
            ui.label(
                RichText::new(
                    "Pollution burden and demographics for the selected \
                     California census tracts.",
                )
                .weak(),
            );
            ui.add_space(8.0);

            // ---- Headline metrics ----
            let summary = summary::summarize(&dataset, &view);
            ui.columns(3, |cols: &mut [Ui]| {
                metric(
                    &mut cols[0],
                    "Census tracts",
                    chart::format_thousands(summary.tract_count as f64),
                );
                let mean = summary
                    .mean_percentile
                    .map(|m| format!("{m:.1}"))
                    .unwrap_or_else(|| "no data".to_string());
                metric(&mut cols[1], "Mean CES percentile", mean);
                metric(
                    &mut cols[2],
                    "Total population",
                    chart::format_thousands(summary.total_population),
                );
            });

            ui.add_space(8.0);
            ui.separator();

            // ---- Map ----
            section_title(ui, "Community map");
            charts::map_plot(ui, &chart::map_spec(&dataset, &view));

            ui.add_space(8.0);
            ui.separator();

            // ---- Indicators and demographics side by side ----
            ui.columns(2, |cols: &mut [Ui]| {
                section_title(&mut cols[0], "Average indicator percentiles");
                charts::ranked_bar_plot(&mut cols[0], &chart::ranked_bars(&dataset, &view));

                section_title(&mut cols[1], "Race and ethnicity");
                charts::composition_donut(&mut cols[1], &chart::composition(&dataset, &view));
                sensitive_populations(&mut cols[1], &dataset, &view);
            });

            ui.add_space(8.0);
            ui.separator();

            // ---- Detail table and export ----
            detail_table(ui, &dataset, &view);

            ui.add_space(8.0);
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Export filtered data (CSV)").clicked() {
                    panels::save_export_dialog(state);
                }
                ui.label(
                    RichText::new(format!("writes {} rows", view.len()))
                        .weak()
                        .small(),
                );
            });
            ui.add_space(12.0);
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(value).size(22.0).strong());
        ui.label(RichText::new(label).weak().small());
    });
}

fn section_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(16.0));
    ui.add_space(4.0);
}

fn sensitive_populations(ui: &mut Ui, dataset: &Dataset, view: &[usize]) {
    let means = summary::sensitive_population_means(dataset, view);
    if means.is_empty() {
        return;
    }
    ui.add_space(6.0);
    ui.strong("Sensitive populations");
    for m in means {
        ui.label(format!(
            "{}: {:.1}% of tract population on average",
            m.group.label(),
            m.mean_pct
        ));
    }
}

fn detail_table(ui: &mut Ui, dataset: &Dataset, view: &[usize]) {
    let header_text = format!("Tract details  ({} rows)", view.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("tract_details")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let rows = chart::detail_rows(dataset, view);
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(true)
                .max_scroll_height(280.0)
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::remainder())
                .column(Column::auto())
                .column(Column::auto())
                .column(Column::auto())
                .header(20.0, |mut header| {
                    for title in chart::DETAIL_COLUMNS {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let record = &dataset.records[rows[row.index()]];
                        row.col(|ui| {
                            ui.label(&record.tract);
                        });
                        row.col(|ui| {
                            ui.label(&record.county);
                        });
                        row.col(|ui| {
                            ui.label(&record.location);
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", record.score));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", record.percentile));
                        });
                        row.col(|ui| {
                            ui.label(chart::format_thousands(record.population));
                        });
                    });
                });
        });
}
