use thiserror::Error;

/// Conditions the dashboard reports to the user.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no data to export")]
    NothingToExport,
    #[error("malformed bookmark: {0}")]
    MalformedBookmark(#[from] serde_json::Error),
    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}
