use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    SpendDataset, SpendRecord, GEO_KEY, PROJECT_TYPE_KEY, SECTOR_KEY, SPEND_KEY, YEAR_KEY,
};
use crate::errors::DashboardError;

/// Dataset compiled into the binary.
const BUNDLED_DATA: &str = include_str!("../../assets/data.json");

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the dataset shipped with the application.
pub fn load_bundled() -> Result<SpendDataset> {
    parse_json(BUNDLED_DATA).context("parsing bundled dataset")
}

/// Load a spend dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – columns `GEO`, `SECTOR`, `PROJECT_TYPE_GRP`, `YEAR`, `SPEND (in Billion $)`
/// * `.json`    – `[{ "GEO": ..., "YEAR": 2020, "SPEND (in Billion $)": 1.5, ... }, ...]`
/// * `.csv`     – header row with the same column names
pub fn load_file(path: &Path) -> Result<SpendDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Raw cell values of one row before normalization.
struct RawRow<'a> {
    geography: Option<&'a str>,
    sector: Option<&'a str>,
    project_type_group: Option<&'a str>,
    year: Option<i64>,
    spend: Option<f64>,
}

/// The single place where missing values get their defaults: categorical
/// fields become empty, spend becomes zero. A row without a year is rejected.
fn normalize(row: usize, raw: RawRow<'_>) -> Result<SpendRecord, DashboardError> {
    let year = raw.year.ok_or_else(|| DashboardError::InvalidRecord {
        row,
        reason: format!("missing or non-integer '{YEAR_KEY}'"),
    })?;
    let year = i32::try_from(year).map_err(|_| DashboardError::InvalidRecord {
        row,
        reason: format!("'{YEAR_KEY}' {year} is out of range"),
    })?;
    let spend = raw.spend.filter(|s| s.is_finite()).unwrap_or(0.0);

    Ok(SpendRecord {
        geography: raw.geography.unwrap_or_default().to_string(),
        sector: raw.sector.unwrap_or_default().to_string(),
        project_type_group: raw.project_type_group.unwrap_or_default().to_string(),
        year,
        spend,
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<SpendDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "GEO": "West",
///     "SECTOR": "Energy",
///     "PROJECT_TYPE_GRP": "Capital Expansion",
///     "YEAR": 2020,
///     "SPEND (in Billion $)": 5.2
///   },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<SpendDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let geography = json_text(obj, GEO_KEY);
        let sector = json_text(obj, SECTOR_KEY);
        let project_type_group = json_text(obj, PROJECT_TYPE_KEY);
        let raw = RawRow {
            geography: geography.as_deref(),
            sector: sector.as_deref(),
            project_type_group: project_type_group.as_deref(),
            year: obj.get(YEAR_KEY).and_then(json_year),
            spend: obj.get(SPEND_KEY).and_then(json_number),
        };
        records.push(normalize(i, raw)?);
    }

    Ok(SpendDataset::from_records(records))
}

fn json_text(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match obj.get(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

fn json_year(val: &JsonValue) -> Option<i64> {
    match val {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_number(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the dataset column names, one record per row.
/// An empty `SPEND` cell loads as zero.
fn load_csv(path: &Path) -> Result<SpendDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<SpendDataset> {
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);

    let geo_idx = column(GEO_KEY);
    let sector_idx = column(SECTOR_KEY);
    let type_idx = column(PROJECT_TYPE_KEY);
    let year_idx = column(YEAR_KEY).with_context(|| format!("CSV missing '{YEAR_KEY}' column"))?;
    let spend_idx = column(SPEND_KEY);

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).filter(|s| !s.is_empty());

        let raw = RawRow {
            geography: cell(geo_idx),
            sector: cell(sector_idx),
            project_type_group: cell(type_idx),
            year: cell(Some(year_idx)).and_then(|s| s.trim().parse().ok()),
            spend: cell(spend_idx).and_then(|s| s.trim().parse().ok()),
        };
        records.push(normalize(row_no, raw)?);
    }

    Ok(SpendDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of spend records.
///
/// Categorical columns must be Utf8/LargeUtf8, `YEAR` Int32/Int64 and spend
/// Float32/Float64 (or an integer type). Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SpendDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let geo_col = column(GEO_KEY);
        let sector_col = column(SECTOR_KEY);
        let type_col = column(PROJECT_TYPE_KEY);
        let year_col = column(YEAR_KEY)
            .ok_or_else(|| anyhow::anyhow!("Parquet file missing '{YEAR_KEY}' column"))?;
        let spend_col = column(SPEND_KEY);

        for row in 0..batch.num_rows() {
            let geography = geo_col.and_then(|c| extract_text(c, row));
            let sector = sector_col.and_then(|c| extract_text(c, row));
            let project_type_group = type_col.and_then(|c| extract_text(c, row));

            let raw = RawRow {
                geography: geography.as_deref(),
                sector: sector.as_deref(),
                project_type_group: project_type_group.as_deref(),
                year: extract_int(year_col, row),
                spend: spend_col.and_then(|c| extract_float(c, row)),
            };
            records.push(normalize(records.len(), raw)?);
        }
    }

    Ok(SpendDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn extract_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

fn extract_int(col: &Arc<dyn Array>, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as i64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

fn extract_float(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Int32 | DataType::Int64 => extract_int(col, row).map(|v| v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_loads() {
        let ds = load_bundled().unwrap();
        assert!(!ds.is_empty());
        assert!(ds.records().iter().all(|r| r.year != 0 && r.spend.is_finite()));
    }

    #[test]
    fn missing_spend_is_normalized_to_zero() {
        let ds = parse_json(
            r#"[
                {"GEO": "West", "SECTOR": "Energy", "PROJECT_TYPE_GRP": "Capital", "YEAR": 2020},
                {"GEO": "West", "SECTOR": "Energy", "PROJECT_TYPE_GRP": "Capital", "YEAR": "2021",
                 "SPEND (in Billion $)": null},
                {"GEO": null, "SECTOR": "Energy", "YEAR": 2022, "SPEND (in Billion $)": 2.5}
            ]"#,
        )
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[0].spend, 0.0);
        assert_eq!(ds.records()[1].spend, 0.0);
        assert_eq!(ds.records()[1].year, 2021);
        assert_eq!(ds.records()[2].geography, "");
        assert_eq!(ds.records()[2].project_type_group, "");
        assert_eq!(ds.records()[2].spend, 2.5);
    }

    #[test]
    fn row_without_valid_year_is_rejected() {
        let err = parse_json(r#"[{"GEO": "West", "YEAR": "soon"}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("row 0"));

        assert!(parse_json(r#"{"GEO": "West"}"#).is_err());
    }

    #[test]
    fn csv_rows_load_with_the_same_columns() {
        let text = "GEO,SECTOR,PROJECT_TYPE_GRP,YEAR,SPEND (in Billion $)\n\
                    West,Energy,Capital Expansion,2020,5\n\
                    East,Energy,Maintenance,2020,\n";
        let ds = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].spend, 5.0);
        assert_eq!(ds.records()[1].spend, 0.0);
        assert_eq!(ds.records()[1].project_type_group, "Maintenance");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(load_file(Path::new("spend.xlsx")).is_err());
    }
}
