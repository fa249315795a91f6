use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Table of the records passing the current filters.
pub fn filtered_table(ui: &mut Ui, state: &AppState) {
    let dataset = &state.dataset;
    let rows = &state.view.filtered;
    if rows.is_empty() {
        ui.weak("No data available");
        return;
    }

    let field_names = dataset.field_names();
    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(320.0)
        .columns(Column::auto().at_least(80.0).resizable(true), field_names.len())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for name in field_names {
                header.col(|ui: &mut Ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let Some(record) = dataset.get(rows[row.index()]) else {
                    return;
                };
                for value in record.field_values() {
                    row.col(|ui: &mut Ui| {
                        ui.label(value);
                    });
                }
            });
        });
}
