use std::f64::consts::TAU;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::color::{hex_color, sector_color, BAR_COLOR, LINE_COLOR};
use crate::data::aggregate::{BucketTotal, SectorTotal, TimePoint};

const CHART_HEIGHT: f32 = 260.0;
const PIE_HEIGHT: f32 = 340.0;
/// Arc segments per full turn of the pie.
const PIE_RESOLUTION: f64 = 180.0;

/// Placeholder shown instead of an empty chart.
fn no_data(ui: &mut Ui, height: f32) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("No data available");
        });
    });
}

// ---------------------------------------------------------------------------
// Spending over time
// ---------------------------------------------------------------------------

pub fn time_series_chart(ui: &mut Ui, series: &[TimePoint]) {
    ui.heading("Spending Over Time");
    if series.is_empty() {
        no_data(ui, CHART_HEIGHT);
        return;
    }

    let points: Vec<[f64; 2]> = series
        .iter()
        .map(|p| [p.year as f64, p.total_spend])
        .collect();
    let color = hex_color(LINE_COLOR);

    Plot::new("time_series_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Spend (B$)")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("spend")
                    .color(color)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(points)).radius(3.0).color(color));
        });
}

// ---------------------------------------------------------------------------
// Capital vs maintenance
// ---------------------------------------------------------------------------

pub fn bucket_chart(ui: &mut Ui, buckets: &[BucketTotal]) {
    ui.heading("Capital vs Maintenance");
    if buckets.is_empty() {
        no_data(ui, CHART_HEIGHT);
        return;
    }

    let fill = hex_color(BAR_COLOR);
    // Bars sit at 0, 1, .. in emitted order, and so do their axis labels.
    let labels = bucket_labels(buckets);
    let bars: Vec<Bar> = buckets
        .iter()
        .zip(&labels)
        .enumerate()
        .map(|(i, (b, label))| {
            Bar::new(i as f64, b.total_spend)
                .name(label)
                .fill(fill)
                .width(0.6)
        })
        .collect();

    Plot::new("bucket_plot")
        .height(CHART_HEIGHT)
        .y_axis_label("Spend (B$)")
        .x_axis_formatter(move |mark, _range| axis_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(fill).name("value"));
        });

    ui.horizontal(|ui: &mut Ui| {
        for b in buckets {
            ui.label(format!("{}: {:.2}", b.bucket, b.total_spend));
        }
    });
}

fn bucket_labels(buckets: &[BucketTotal]) -> Vec<String> {
    buckets.iter().map(|b| b.bucket.to_string()).collect()
}

/// Label of the bar at `x`, or nothing between bars.
fn axis_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > f64::EPSILON || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sectoral split
// ---------------------------------------------------------------------------

pub fn sector_chart(ui: &mut Ui, sectors: &[SectorTotal]) {
    ui.heading("Sectoral Split");
    if sectors.is_empty() {
        no_data(ui, PIE_HEIGHT);
        return;
    }

    let slices = pie_slices(sectors);

    Plot::new("sector_plot")
        .height(PIE_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (sector, outline)) in slices.into_iter().enumerate() {
                let color = sector_color(i);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(outline))
                        .name(sector)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
        });
}

/// Unit-circle outlines of each slice, labelled with the sector and its
/// total. Totals here are never zero, the aggregator drops those.
fn pie_slices(sectors: &[SectorTotal]) -> Vec<(String, Vec<[f64; 2]>)> {
    let grand_total: f64 = sectors.iter().map(|s| s.total_spend.abs()).sum();
    let mut start = 0.0;
    sectors
        .iter()
        .map(|s| {
            let sweep = TAU * s.total_spend.abs() / grand_total;
            let steps = ((sweep / TAU) * PIE_RESOLUTION).ceil().max(1.0) as usize;
            let mut outline = Vec::with_capacity(steps + 2);
            outline.push([0.0, 0.0]);
            for k in 0..=steps {
                let angle = start + sweep * k as f64 / steps as f64;
                outline.push([angle.cos(), angle.sin()]);
            }
            start += sweep;
            (format!("{} ({:.2})", s.sector, s.total_spend), outline)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::category_buckets;
    use crate::data::model::fixtures::record;

    #[test]
    fn maintenance_only_bar_is_labelled_maintenance() {
        let records = [record("East", "Energy", "Maintenance", 2020, 3.0)];
        let buckets = category_buckets(&records);
        assert_eq!(buckets.len(), 1);

        let labels = bucket_labels(&buckets);
        assert_eq!(axis_label(&labels, 0.0), buckets[0].bucket.to_string());
        assert_eq!(axis_label(&labels, 0.0), "Maintenance");
        assert_eq!(axis_label(&labels, 1.0), "");
        assert_eq!(axis_label(&labels, 0.5), "");
    }

    #[test]
    fn both_buckets_label_in_order() {
        let records = [
            record("West", "Energy", "Capital Expansion", 2020, 5.0),
            record("East", "Energy", "Maintenance", 2020, 3.0),
        ];
        let labels = bucket_labels(&category_buckets(&records));
        assert_eq!(axis_label(&labels, 0.0), "Capital");
        assert_eq!(axis_label(&labels, 1.0), "Maintenance");
    }

    #[test]
    fn pie_slices_cover_the_full_circle() {
        let sectors = vec![
            SectorTotal { sector: "Energy".into(), total_spend: 3.0 },
            SectorTotal { sector: "Mining".into(), total_spend: 1.0 },
        ];
        let slices = pie_slices(&sectors);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].0, "Energy (3.00)");

        // Energy spans three quarters; the last slice closes at angle TAU.
        let energy_end = slices[0].1.last().unwrap();
        assert!((energy_end[0] - 0.0).abs() < 1e-9 && (energy_end[1] + 1.0).abs() < 1e-9);
        let mining_end = slices[1].1.last().unwrap();
        assert!((mining_end[0] - 1.0).abs() < 1e-9 && mining_end[1].abs() < 1e-9);
    }
}
