mod app;
mod bookmark;
mod cli;
mod color;
mod data;
mod errors;
mod state;
mod ui;

use anyhow::Result;
use app::DashboardApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let mut cli = Cli::parse();
    match cli.command.take() {
        Some(command) => cli.run(command),
        None => run_gui(&cli),
    }
}

fn run_gui(cli: &Cli) -> Result<()> {
    // A broken user file should not keep the dashboard from opening.
    let (dataset, load_error) = match cli.load_dataset() {
        Ok(dataset) => (dataset, None),
        Err(e) if cli.data.is_some() => {
            log::error!("Failed to load dataset: {e:#}");
            (data::loader::load_bundled()?, Some(format!("Error: {e:#}")))
        }
        Err(e) => return Err(e),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Industrial Forecast Intelligence Tool",
        options,
        Box::new(move |cc| {
            let mut app = DashboardApp::new(cc, dataset);
            if let Some(msg) = load_error {
                app.state.set_status(msg, true);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
