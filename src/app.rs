use eframe::egui::{self, ScrollArea, Ui};

use crate::bookmark::restore_bookmark;
use crate::data::filter::FilterSelection;
use crate::data::model::SpendDataset;
use crate::state::AppState;
use crate::ui::panels::{self, PanelAction};
use crate::ui::{charts, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app, restoring the bookmarked selection from eframe's
    /// storage. This is the only place the bookmark is read.
    pub fn new(cc: &eframe::CreationContext<'_>, dataset: SpendDataset) -> Self {
        let selection = cc
            .storage
            .map(|storage| restore_bookmark(storage))
            .unwrap_or_else(FilterSelection::default);
        Self {
            state: AppState::new(dataset, selection),
        }
    }

    fn handle(&mut self, action: PanelAction, frame: &mut eframe::Frame) {
        match action {
            PanelAction::Export => panels::save_file_dialog(&mut self.state),
            PanelAction::Bookmark => match frame.storage_mut() {
                Some(storage) => self.state.bookmark(storage),
                None => self
                    .state
                    .set_status("Error: no persistent storage available".to_string(), true),
            },
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters and actions ----
        let action = egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| panels::side_panel(ui, &mut self.state))
            .inner;

        if let Some(action) = action {
            self.handle(action, frame);
        }

        // ---- Central panel: charts and rows ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let view = &self.state.view;
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                ui.columns(2, |cols: &mut [Ui]| {
                    charts::time_series_chart(&mut cols[0], &view.time_series);
                    charts::bucket_chart(&mut cols[1], &view.buckets);
                });
                ui.separator();
                charts::sector_chart(ui, &view.sectors);
                ui.separator();
                egui::CollapsingHeader::new("Filtered records")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        table::filtered_table(ui, &self.state);
                    });
            });
        });
    }
}
