use std::fmt;

use super::filter::{distinct_years, filter_records, FilterSelection};
use super::model::{SpendDataset, SpendRecord};

// ---------------------------------------------------------------------------
// Derived series
// ---------------------------------------------------------------------------

/// One point of the spend-over-time chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub year: i32,
    pub total_spend: f64,
}

/// Capital vs. maintenance classification of a project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Capital,
    Maintenance,
}

impl Bucket {
    pub const ALL: [Bucket; 2] = [Bucket::Capital, Bucket::Maintenance];

    fn needle(self) -> &'static str {
        match self {
            Bucket::Capital => "capital",
            Bucket::Maintenance => "maintenance",
        }
    }

    /// Case-insensitive substring match. The two buckets are checked
    /// independently, so a project type can land in both.
    pub fn contains(self, project_type_group: &str) -> bool {
        project_type_group.to_lowercase().contains(self.needle())
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Capital => write!(f, "Capital"),
            Bucket::Maintenance => write!(f, "Maintenance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketTotal {
    pub bucket: Bucket,
    pub total_spend: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorTotal {
    pub sector: String,
    pub total_spend: f64,
}

// ---------------------------------------------------------------------------
// Aggregators
// ---------------------------------------------------------------------------

/// Spend per year over the full dataset, filtered on every dimension except
/// year. Years with a zero total are dropped.
pub fn time_series(dataset: &SpendDataset, selection: &FilterSelection) -> Vec<TimePoint> {
    distinct_years(dataset)
        .into_iter()
        .map(|year| TimePoint {
            year,
            total_spend: dataset
                .records()
                .iter()
                .filter(|r| r.year == year && selection.matches_ignoring_year(r))
                .map(|r| r.spend)
                .sum(),
        })
        .filter(|p| p.total_spend != 0.0)
        .collect()
}

/// Capital and maintenance totals over the filtered records.
pub fn category_buckets<'a, I>(records: I) -> Vec<BucketTotal>
where
    I: IntoIterator<Item = &'a SpendRecord>,
{
    let mut totals = [0.0_f64; 2];
    for r in records {
        for (slot, bucket) in totals.iter_mut().zip(Bucket::ALL) {
            if bucket.contains(&r.project_type_group) {
                *slot += r.spend;
            }
        }
    }
    Bucket::ALL
        .into_iter()
        .zip(totals)
        .filter(|(_, total)| *total != 0.0)
        .map(|(bucket, total_spend)| BucketTotal {
            bucket,
            total_spend,
        })
        .collect()
}

/// Spend per sector over the filtered records, in first-encounter order.
pub fn sector_totals<'a, I>(records: I) -> Vec<SectorTotal>
where
    I: IntoIterator<Item = &'a SpendRecord>,
{
    let mut totals: Vec<SectorTotal> = Vec::new();
    for r in records {
        match totals.iter_mut().find(|t| t.sector == r.sector) {
            Some(t) => t.total_spend += r.spend,
            None => totals.push(SectorTotal {
                sector: r.sector.clone(),
                total_spend: r.spend,
            }),
        }
    }
    totals.retain(|t| t.total_spend != 0.0);
    totals
}

// ---------------------------------------------------------------------------
// DashboardView – everything the charts need for one selection
// ---------------------------------------------------------------------------

/// Derived views for one (dataset, selection) pair. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Indices into the dataset of records passing all four filters.
    pub filtered: Vec<usize>,
    pub time_series: Vec<TimePoint>,
    pub buckets: Vec<BucketTotal>,
    pub sectors: Vec<SectorTotal>,
}

impl DashboardView {
    /// Pure recompute of every derived series.
    pub fn compute(dataset: &SpendDataset, selection: &FilterSelection) -> Self {
        let filtered = filter_records(dataset, selection);
        let rows = || filtered.iter().filter_map(|&i| dataset.get(i));
        DashboardView {
            time_series: time_series(dataset, selection),
            buckets: category_buckets(rows()),
            sectors: sector_totals(rows()),
            filtered,
        }
    }

    /// Total spend over the filtered records.
    pub fn filtered_spend(&self, dataset: &SpendDataset) -> f64 {
        self.filtered
            .iter()
            .filter_map(|&i| dataset.get(i))
            .map(|r| r.spend)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{energy_dataset, record};

    fn west() -> FilterSelection {
        FilterSelection {
            geography: Some("West".into()),
            ..Default::default()
        }
    }

    #[test]
    fn west_energy_example() {
        let ds = energy_dataset();
        let view = DashboardView::compute(&ds, &west());

        assert_eq!(view.filtered.len(), 2);
        assert_eq!(
            view.time_series,
            vec![
                TimePoint { year: 2020, total_spend: 5.0 },
                TimePoint { year: 2021, total_spend: 7.0 },
            ]
        );
        assert_eq!(
            view.buckets,
            vec![BucketTotal { bucket: Bucket::Capital, total_spend: 12.0 }]
        );
        assert_eq!(
            view.sectors,
            vec![SectorTotal { sector: "Energy".into(), total_spend: 12.0 }]
        );
    }

    #[test]
    fn time_series_ignores_year_filter() {
        let ds = energy_dataset();
        let mut sel = west();
        sel.year = Some(2020);
        let view = DashboardView::compute(&ds, &sel);

        assert_eq!(view.filtered, vec![0]);
        assert_eq!(view.time_series.len(), 2);
        assert_eq!(view.sectors[0].total_spend, 5.0);
    }

    #[test]
    fn time_series_sorted_and_matches_manual_sums() {
        let ds = SpendDataset::from_records(vec![
            record("North", "Rail", "Capital", 2023, 2.0),
            record("North", "Rail", "Capital", 2019, 1.5),
            record("South", "Rail", "Capital", 2021, 4.0),
            record("North", "Rail", "Maintenance", 2021, 0.0),
            record("North", "Rail", "Capital", 2023, 0.5),
        ]);
        let sel = FilterSelection {
            geography: Some("North".into()),
            ..Default::default()
        };
        let series = time_series(&ds, &sel);

        // 2021 sums to zero for North and is omitted.
        assert_eq!(series.iter().map(|p| p.year).collect::<Vec<_>>(), vec![2019, 2023]);
        assert!(series.windows(2).all(|w| w[0].year < w[1].year));
        for p in &series {
            let manual: f64 = ds
                .records()
                .iter()
                .filter(|r| r.year == p.year && sel.matches_ignoring_year(r))
                .map(|r| r.spend)
                .sum();
            assert_eq!(p.total_spend, manual);
        }
    }

    #[test]
    fn bucket_matching_is_case_insensitive_and_overlapping() {
        let records = [
            record("A", "S", "CAPITAL works", 2020, 1.0),
            record("A", "S", "Routine maintenance", 2020, 2.0),
            record("A", "S", "Capital maintenance", 2020, 4.0),
            record("A", "S", "Decommissioning", 2020, 8.0),
        ];
        let buckets = category_buckets(&records);
        assert_eq!(
            buckets,
            vec![
                BucketTotal { bucket: Bucket::Capital, total_spend: 5.0 },
                BucketTotal { bucket: Bucket::Maintenance, total_spend: 6.0 },
            ]
        );
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let records: [SpendRecord; 0] = [];
        assert!(category_buckets(&records).is_empty());
        assert!(sector_totals(&records).is_empty());

        let ds = energy_dataset();
        let sel = FilterSelection {
            sector: Some("Water".into()),
            ..Default::default()
        };
        let view = DashboardView::compute(&ds, &sel);
        assert_eq!(view, DashboardView::default());
    }

    #[test]
    fn sector_totals_keep_first_encounter_order_and_sum_to_filtered_spend() {
        let ds = SpendDataset::from_records(vec![
            record("A", "Mining", "Capital", 2020, 1.0),
            record("A", "Energy", "Capital", 2020, 2.0),
            record("A", "Mining", "Maintenance", 2021, 3.0),
            record("A", "Water", "Maintenance", 2021, 0.0),
        ]);
        let view = DashboardView::compute(&ds, &FilterSelection::default());
        assert_eq!(
            view.sectors,
            vec![
                SectorTotal { sector: "Mining".into(), total_spend: 4.0 },
                SectorTotal { sector: "Energy".into(), total_spend: 2.0 },
            ]
        );
        let total: f64 = view.sectors.iter().map(|s| s.total_spend).sum();
        assert_eq!(total, view.filtered_spend(&ds));
    }

    #[test]
    fn recompute_is_idempotent() {
        let ds = energy_dataset();
        let sel = west();
        assert_eq!(DashboardView::compute(&ds, &sel), DashboardView::compute(&ds, &sel));
    }
}
