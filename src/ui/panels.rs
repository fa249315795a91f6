use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::model::FilterField;
use crate::state::AppState;

/// Button presses the app handles with access to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Export,
    Bookmark,
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) -> Option<PanelAction> {
    ui.heading("Filters");
    ui.separator();

    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in FilterField::ALL {
                filter_combo(ui, state, field);
                ui.add_space(6.0);
            }

            if ui.small_button("Clear").clicked() {
                state.clear_filters();
            }

            ui.separator();

            ui.vertical_centered_justified(|ui: &mut Ui| {
                if ui.button("Download CSV").clicked() {
                    action = Some(PanelAction::Export);
                }
                if ui.button("Bookmark Filters").clicked() {
                    action = Some(PanelAction::Bookmark);
                }
            });
        });

    action
}

/// One selection control: "All …" plus every facet value of `field`.
fn filter_combo(ui: &mut Ui, state: &mut AppState, field: FilterField) {
    ui.strong(field.to_string());

    let current = state.selection.get(field);
    let selected_text = current
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| field.all_label().to_string());

    let mut choice = current.clone();
    egui::ComboBox::from_id_salt(field.all_label())
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut choice, None, field.all_label());
            for value in state.facets.for_field(field) {
                ui.selectable_value(&mut choice, Some(value.clone()), value.to_string());
            }
        });

    if choice != current {
        state.set_filter(field, choice);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Industrial Forecast Intelligence Tool");

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} matching, {:.2} B$ total",
            state.dataset.len(),
            state.view.filtered.len(),
            state.view.filtered_spend(&state.dataset)
        ));

        if let Some((msg, is_error)) = &state.status_message {
            ui.separator();
            let color = if *is_error { Color32::RED } else { Color32::DARK_GREEN };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Ask where to save the export and write it. Cancelling does nothing.
pub fn save_file_dialog(state: &mut AppState) {
    if state.view.filtered.is_empty() {
        state.set_status("No data to download".to_string(), true);
        return;
    }

    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
