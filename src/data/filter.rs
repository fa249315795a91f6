use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::model::{FilterField, SpendDataset, SpendRecord};

// ---------------------------------------------------------------------------
// Filter selection: one optional exact-match value per dimension
// ---------------------------------------------------------------------------

/// The user's current constraints. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub geography: Option<String>,
    pub sector: Option<String>,
    pub project_type_group: Option<String>,
    pub year: Option<i32>,
}

impl FilterSelection {
    /// Whether a record satisfies every set constraint.
    pub fn matches(&self, record: &SpendRecord) -> bool {
        self.matches_ignoring_year(record) && self.year.is_none_or(|y| record.year == y)
    }

    /// Same as [`matches`](Self::matches) but without the year constraint.
    /// The time series bins by year itself.
    pub fn matches_ignoring_year(&self, record: &SpendRecord) -> bool {
        fn eq(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().is_none_or(|w| w == actual)
        }
        eq(&self.geography, &record.geography)
            && eq(&self.sector, &record.sector)
            && eq(&self.project_type_group, &record.project_type_group)
    }

    /// Whether no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        *self == FilterSelection::default()
    }

    /// Current value of one dimension, as a facet value.
    pub fn get(&self, field: FilterField) -> Option<FacetValue> {
        match field {
            FilterField::Geography => self.geography.clone().map(FacetValue::Text),
            FilterField::Sector => self.sector.clone().map(FacetValue::Text),
            FilterField::ProjectType => self.project_type_group.clone().map(FacetValue::Text),
            FilterField::Year => self.year.map(FacetValue::Year),
        }
    }

    /// Set or clear one dimension. A value of the wrong kind for the
    /// dimension clears it.
    pub fn set(&mut self, field: FilterField, value: Option<FacetValue>) {
        match field {
            FilterField::Geography => self.geography = value.and_then(FacetValue::into_text),
            FilterField::Sector => self.sector = value.and_then(FacetValue::into_text),
            FilterField::ProjectType => {
                self.project_type_group = value.and_then(FacetValue::into_text)
            }
            FilterField::Year => self.year = value.and_then(|v| v.as_year()),
        }
    }
}

/// Return indices of records that pass all active filters, in dataset order.
pub fn filter_records(dataset: &SpendDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Facets: distinct selectable values per dimension
// ---------------------------------------------------------------------------

/// One selectable value of a filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FacetValue {
    Text(String),
    Year(i32),
}

impl FacetValue {
    fn into_text(self) -> Option<String> {
        match self {
            FacetValue::Text(s) => Some(s),
            FacetValue::Year(_) => None,
        }
    }

    fn as_year(&self) -> Option<i32> {
        match self {
            FacetValue::Year(y) => Some(*y),
            FacetValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Text(s) => write!(f, "{s}"),
            FacetValue::Year(y) => write!(f, "{y}"),
        }
    }
}

/// Distinct non-empty values of `field` over the full dataset.
///
/// Text facets keep first-encounter order. Years are ascending.
pub fn facet_values(dataset: &SpendDataset, field: FilterField) -> Vec<FacetValue> {
    let records = dataset.records();
    match field {
        FilterField::Geography => distinct_text(records, |r| r.geography.as_str()),
        FilterField::Sector => distinct_text(records, |r| r.sector.as_str()),
        FilterField::ProjectType => distinct_text(records, |r| r.project_type_group.as_str()),
        FilterField::Year => distinct_years(dataset)
            .into_iter()
            .map(FacetValue::Year)
            .collect(),
    }
}

fn distinct_text<'a>(
    records: &'a [SpendRecord],
    get: impl Fn(&'a SpendRecord) -> &'a str,
) -> Vec<FacetValue> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(get)
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(|v| FacetValue::Text(v.to_string()))
        .collect()
}

/// Distinct years of the full dataset, ascending. Year 0 counts as unset.
pub fn distinct_years(dataset: &SpendDataset) -> Vec<i32> {
    dataset
        .records()
        .iter()
        .map(|r| r.year)
        .filter(|&y| y != 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Facet menus for all four dimensions, computed once per dataset.
#[derive(Debug, Clone, Default)]
pub struct Facets {
    pub geography: Vec<FacetValue>,
    pub sector: Vec<FacetValue>,
    pub project_type: Vec<FacetValue>,
    pub year: Vec<FacetValue>,
}

impl Facets {
    pub fn from_dataset(dataset: &SpendDataset) -> Self {
        Facets {
            geography: facet_values(dataset, FilterField::Geography),
            sector: facet_values(dataset, FilterField::Sector),
            project_type: facet_values(dataset, FilterField::ProjectType),
            year: facet_values(dataset, FilterField::Year),
        }
    }

    pub fn for_field(&self, field: FilterField) -> &[FacetValue] {
        match field {
            FilterField::Geography => &self.geography,
            FilterField::Sector => &self.sector,
            FilterField::ProjectType => &self.project_type,
            FilterField::Year => &self.year,
        }
    }
}
