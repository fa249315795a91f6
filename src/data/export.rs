use std::path::Path;

use anyhow::{Context, Result};

use super::model::SpendDataset;
use crate::errors::DashboardError;

/// Default file name offered for the export (`text/csv`).
pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

/// Render the filtered records as CSV text.
///
/// The header is the unquoted field names; every value is wrapped in double
/// quotes as-is. Embedded quotes and commas are not escaped. Lines are joined
/// with `\n` and there is no trailing newline.
pub fn export_csv(dataset: &SpendDataset, indices: &[usize]) -> Result<String, DashboardError> {
    if indices.is_empty() {
        return Err(DashboardError::NothingToExport);
    }

    let mut lines = Vec::with_capacity(indices.len() + 1);
    lines.push(dataset.field_names().join(","));
    for record in indices.iter().filter_map(|&i| dataset.get(i)) {
        let values: Vec<String> = record
            .field_values()
            .iter()
            .map(|v| format!("\"{v}\""))
            .collect();
        lines.push(values.join(","));
    }
    Ok(lines.join("\n"))
}

/// Render and write the export. Nothing is written for an empty selection.
pub fn write_export(dataset: &SpendDataset, indices: &[usize], path: &Path) -> Result<()> {
    let csv = export_csv(dataset, indices)?;
    std::fs::write(path, csv).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} records to {}", indices.len(), path.display());
    Ok(())
}
