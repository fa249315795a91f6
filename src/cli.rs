use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::bookmark::{restore_bookmark, save_bookmark, JsonFileStore};
use crate::data::aggregate::DashboardView;
use crate::data::export::{write_export, EXPORT_FILE_NAME};
use crate::data::filter::FilterSelection;
use crate::data::loader;
use crate::data::model::SpendDataset;

#[derive(Parser)]
#[command(name = "forecast-dashboard")]
#[command(about = "Industrial project spend dashboard with headless summary and export")]
#[command(version)]
pub struct Cli {
    /// Dataset to load instead of the bundled one (.json, .csv, .parquet)
    #[arg(long, env = "DASHBOARD_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// JSON file holding the bookmarked filters for headless commands
    #[arg(long, env = "DASHBOARD_BOOKMARK_FILE", global = true)]
    pub bookmark_file: Option<PathBuf>,

    /// Open the dashboard window when no command is given
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the spend-over-time, capital/maintenance and sector series
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Write the filtered records as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output path
        #[arg(short, long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Save the given filters to the bookmark file
    Bookmark {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// Filter flags shared by the headless commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Region (GEO) to keep
    #[arg(long)]
    pub region: Option<String>,
    /// Sector to keep
    #[arg(long)]
    pub sector: Option<String>,
    /// Project type group to keep
    #[arg(long)]
    pub project_type: Option<String>,
    /// Year to keep
    #[arg(long)]
    pub year: Option<i32>,
}

impl FilterArgs {
    /// No flag carries a usable value. `--region ""` counts as unset.
    fn is_empty(&self) -> bool {
        self.clone().into_selection().is_empty()
    }

    fn into_selection(self) -> FilterSelection {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        FilterSelection {
            geography: non_empty(self.region),
            sector: non_empty(self.sector),
            project_type_group: non_empty(self.project_type),
            year: self.year,
        }
    }
}

impl Cli {
    /// Load `--data` if given, otherwise the bundled dataset.
    pub fn load_dataset(&self) -> Result<SpendDataset> {
        let dataset = match &self.data {
            Some(path) => loader::load_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => loader::load_bundled()?,
        };
        if dataset.is_empty() {
            log::warn!("Dataset has no records; every chart will be empty");
        }
        log::info!("Loaded {} spend records", dataset.len());
        Ok(dataset)
    }

    /// Explicit filter flags win; without any, the bookmark file (if set) is
    /// restored.
    fn selection(&self, filters: FilterArgs) -> FilterSelection {
        match &self.bookmark_file {
            Some(path) if filters.is_empty() => restore_bookmark(&JsonFileStore::new(path)),
            _ => filters.into_selection(),
        }
    }

    /// Run a headless command.
    pub fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Summary { filters } => {
                let dataset = self.load_dataset()?;
                let selection = self.selection(filters);
                let view = DashboardView::compute(&dataset, &selection);
                print!("{}", render_summary(&dataset, &view));
            }
            Commands::Export { filters, out } => {
                let dataset = self.load_dataset()?;
                let selection = self.selection(filters);
                let view = DashboardView::compute(&dataset, &selection);
                write_export(&dataset, &view.filtered, &out)?;
                println!("Wrote {} records to {}", view.filtered.len(), out.display());
            }
            Commands::Bookmark { filters } => {
                let path = self
                    .bookmark_file
                    .as_ref()
                    .context("--bookmark-file is required to save a bookmark")?;
                let mut store = JsonFileStore::new(path);
                save_bookmark(&mut store, &filters.into_selection())?;
                println!("Filters bookmarked!");
            }
        }
        Ok(())
    }
}

/// Plain-text rendering of the three derived series.
pub fn render_summary(dataset: &SpendDataset, view: &DashboardView) -> String {
    let mut out = format!(
        "{} of {} records match, {:.2} B$ total\n",
        view.filtered.len(),
        dataset.len(),
        view.filtered_spend(dataset)
    );

    out.push_str("\nSpending Over Time\n");
    if view.time_series.is_empty() {
        out.push_str("  No data available\n");
    }
    for p in &view.time_series {
        out.push_str(&format!("  {:<6} {:>10.2}\n", p.year, p.total_spend));
    }

    out.push_str("\nCapital vs Maintenance\n");
    if view.buckets.is_empty() {
        out.push_str("  No data available\n");
    }
    for b in &view.buckets {
        out.push_str(&format!("  {:<12} {:>10.2}\n", b.bucket.to_string(), b.total_spend));
    }

    out.push_str("\nSectoral Split\n");
    if view.sectors.is_empty() {
        out.push_str("  No data available\n");
    }
    for s in &view.sectors {
        out.push_str(&format!("  {:<20} {:>10.2}\n", s.sector, s.total_spend));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::energy_dataset;

    #[test]
    fn parses_headless_export() {
        let cli = Cli::try_parse_from([
            "forecast-dashboard",
            "export",
            "--region",
            "West",
            "--year",
            "2021",
            "--out",
            "west.csv",
        ])
        .unwrap();
        let Some(Commands::Export { filters, out }) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(out, PathBuf::from("west.csv"));
        assert_eq!(
            filters.into_selection(),
            FilterSelection {
                geography: Some("West".into()),
                year: Some(2021),
                ..Default::default()
            }
        );
    }

    #[test]
    fn empty_filter_flags_fall_back_to_bookmark() {
        let path = std::env::temp_dir().join(format!(
            "forecast-dashboard-cli-bookmark-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        let bookmarked = FilterSelection {
            sector: Some("Mining".into()),
            ..Default::default()
        };
        save_bookmark(&mut JsonFileStore::new(&path), &bookmarked).unwrap();

        let cli = Cli::try_parse_from([
            "forecast-dashboard",
            "--bookmark-file",
            path.to_str().unwrap(),
            "summary",
            "--region",
            "",
        ])
        .unwrap();
        let Some(Commands::Summary { filters }) = &cli.command else {
            panic!("expected summary command");
        };
        assert!(filters.is_empty());
        assert_eq!(cli.selection(filters.clone()), bookmarked);

        let explicit = FilterArgs {
            region: Some("West".into()),
            ..Default::default()
        };
        assert_eq!(cli.selection(explicit).geography.as_deref(), Some("West"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn no_command_means_gui() {
        let cli = Cli::try_parse_from(["forecast-dashboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(Cli::try_parse_from(["forecast-dashboard", "summary", "--year", "soon"]).is_err());
    }

    #[test]
    fn summary_shows_placeholders_for_empty_series() {
        let ds = energy_dataset();
        let selection = FilterSelection {
            sector: Some("Water".into()),
            ..Default::default()
        };
        let text = render_summary(&ds, &DashboardView::compute(&ds, &selection));
        assert!(text.starts_with("0 of 3 records match"));
        assert_eq!(text.matches("No data available").count(), 3);
    }

    #[test]
    fn summary_lists_each_series() {
        let ds = energy_dataset();
        let text = render_summary(&ds, &DashboardView::compute(&ds, &FilterSelection::default()));
        assert!(text.contains("2020"));
        assert!(text.contains("Maintenance"));
        assert!(text.contains("Energy"));
        assert!(!text.contains("No data available"));
    }
}
