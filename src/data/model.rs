use std::fmt;

// ---------------------------------------------------------------------------
// Source field names
// ---------------------------------------------------------------------------

pub const GEO_KEY: &str = "GEO";
pub const SECTOR_KEY: &str = "SECTOR";
pub const PROJECT_TYPE_KEY: &str = "PROJECT_TYPE_GRP";
pub const YEAR_KEY: &str = "YEAR";
pub const SPEND_KEY: &str = "SPEND (in Billion $)";

/// Field names in declaration order, as they appear in the bundled dataset.
pub const FIELD_NAMES: [&str; 5] = [GEO_KEY, SECTOR_KEY, PROJECT_TYPE_KEY, YEAR_KEY, SPEND_KEY];

// ---------------------------------------------------------------------------
// SpendRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single project spending record.
///
/// Spend is already normalized by the loader: a missing value is `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendRecord {
    pub geography: String,
    pub sector: String,
    pub project_type_group: String,
    pub year: i32,
    /// Billions of currency units.
    pub spend: f64,
}

impl SpendRecord {
    /// Stringified values in [`FIELD_NAMES`] order.
    pub fn field_values(&self) -> [String; 5] {
        [
            self.geography.clone(),
            self.sector.clone(),
            self.project_type_group.clone(),
            self.year.to_string(),
            format_number(self.spend),
        ]
    }
}

/// Shortest round-trip text of a number, switching to exponent form below
/// `1e-6` and from `1e21` up (`1e+21`, `1.5e-7`), as the source JSON tooling
/// prints numbers.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let text = format!("{value:e}");
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    value.to_string()
}

// ---------------------------------------------------------------------------
// FilterField – the four filterable dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Geography,
    Sector,
    ProjectType,
    Year,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Geography,
        FilterField::Sector,
        FilterField::ProjectType,
        FilterField::Year,
    ];

    /// Label of the "no constraint" entry in the selection control.
    pub fn all_label(self) -> &'static str {
        match self {
            FilterField::Geography => "All Regions",
            FilterField::Sector => "All Sectors",
            FilterField::ProjectType => "All Project Types",
            FilterField::Year => "All Years",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Geography => write!(f, "Region"),
            FilterField::Sector => write!(f, "Sector"),
            FilterField::ProjectType => write!(f, "Project type"),
            FilterField::Year => write!(f, "Year"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpendDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full record collection. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct SpendDataset {
    records: Vec<SpendRecord>,
}

impl SpendDataset {
    pub fn from_records(records: Vec<SpendRecord>) -> Self {
        SpendDataset { records }
    }

    pub fn records(&self) -> &[SpendRecord] {
        &self.records
    }

    /// Record at a dataset index, as produced by the filter.
    pub fn get(&self, idx: usize) -> Option<&SpendRecord> {
        self.records.get(idx)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field names used as the export header.
    pub fn field_names(&self) -> &'static [&'static str] {
        &FIELD_NAMES
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(geo: &str, sector: &str, kind: &str, year: i32, spend: f64) -> SpendRecord {
        SpendRecord {
            geography: geo.to_string(),
            sector: sector.to_string(),
            project_type_group: kind.to_string(),
            year,
            spend,
        }
    }

    /// West/East energy example used across the engine tests.
    pub fn energy_dataset() -> SpendDataset {
        SpendDataset::from_records(vec![
            record("West", "Energy", "Capital Expansion", 2020, 5.0),
            record("East", "Energy", "Maintenance", 2020, 3.0),
            record("West", "Energy", "Capital Expansion", 2021, 7.0),
        ])
    }
}
