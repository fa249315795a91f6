use std::str::FromStr;

use eframe::egui::Color32;
use palette::Srgb;

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Slice colours for the sector split, cycled by position.
pub const SECTOR_PALETTE: [&str; 4] = ["#0088FE", "#00C49F", "#FFBB28", "#FF8042"];

/// Stroke of the spend-over-time line.
pub const LINE_COLOR: &str = "#8884d8";

/// Fill of the capital/maintenance bars.
pub const BAR_COLOR: &str = "#82ca9d";

/// Parse a `#rrggbb` hex colour. Unparseable input maps to grey.
pub fn hex_color(hex: &str) -> Color32 {
    match Srgb::<u8>::from_str(hex) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(e) => {
            log::warn!("Invalid colour {hex:?}: {e}");
            Color32::GRAY
        }
    }
}

/// Colour of the `position`-th sector slice.
pub fn sector_color(position: usize) -> Color32 {
    hex_color(SECTOR_PALETTE[position % SECTOR_PALETTE.len()])
}
