/// Data layer: records, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///  bundled data.json / .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + normalize → SpendDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → filtered indices, facet menus
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  time series, capital/maintenance, sector split
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered rows → CSV text
///   └──────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
