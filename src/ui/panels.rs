use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::Metric;
use crate::state::{load_source, AppState, ChartSlot, Source};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – selectors
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Price, Efficiency, and Range by Brand");
    metric_radio(ui, state, ChartSlot::BrandBar);
    ui.separator();

    ui.strong("Distribution by Body Style");
    metric_radio(ui, state, ChartSlot::BodyStyleHistogram);
    ui.separator();

    ui.strong("Price vs. (Y axis)");
    metric_combo(ui, state, ChartSlot::PriceScatter);
    ui.separator();

    ui.checkbox(&mut state.show_table, "Show data table");
}

/// Radio buttons over the slot's choices.
fn metric_radio(ui: &mut Ui, state: &mut AppState, slot: ChartSlot) {
    let mut selected = state.metric(slot);
    ui.horizontal(|ui: &mut Ui| {
        for &metric in slot.choices() {
            ui.radio_value(&mut selected, metric, metric.name());
        }
    });
    state.select_metric(slot, selected);
}

/// Drop-down over the slot's choices.
fn metric_combo(ui: &mut Ui, state: &mut AppState, slot: ChartSlot) {
    let current: Metric = state.metric(slot);
    let mut selected = current;
    egui::ComboBox::from_id_salt(("metric", slot as usize))
        .selected_text(current.name())
        .show_ui(ui, |ui: &mut Ui| {
            for &metric in slot.choices() {
                ui.selectable_value(&mut selected, metric, metric.name());
            }
        });
    state.select_metric(slot, selected);
}

// ---------------------------------------------------------------------------
// Central panel – charts, or the single error state
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(format!("Could not load data: {err}")).color(Color32::RED));
        });
        return;
    }

    let Some(vehicles) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view vehicles  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Price, Efficiency, and Range of EVs by Brand");
            for slot in ChartSlot::ALL {
                if let Some(panel) = state.panel(slot) {
                    plot::chart(ui, &format!("chart_{}", slot as usize), panel);
                    ui.add_space(12.0);
                }
            }

            if state.show_table {
                ui.separator();
                table::vehicle_table(ui, vehicles);
            }
        });
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
        });

        ui.separator();

        if let Some(source) = &state.source {
            ui.label(source.to_string());
        }

        if let Some(table) = &state.table {
            ui.separator();
            if table.is_empty() {
                ui.label("no vehicles");
            } else {
                ui.label(format!("{} vehicles loaded", table.len()));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open electric-vehicle data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        let source = Source::File(path);
        let result = load_source(&source, &state.config.normalize);
        if let Ok(table) = &result {
            log::info!("Loaded {} vehicles from {source}", table.len());
        }
        state.set_loaded(source, result);
    }
}
