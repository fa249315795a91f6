use std::path::Path;

use crate::bookmark::{save_bookmark, KeyValueStore};
use crate::data::aggregate::DashboardView;
use crate::data::export::write_export;
use crate::data::filter::{FacetValue, Facets, FilterSelection};
use crate::data::model::{FilterField, SpendDataset};
use crate::errors::DashboardError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
pub struct AppState {
    /// Loaded dataset. Never mutated once set.
    pub dataset: SpendDataset,

    /// Facet menus, computed from the full dataset.
    pub facets: Facets,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Derived series for `selection` (cached).
    pub view: DashboardView,

    /// Status message shown in the UI, with whether it reports a failure.
    pub status_message: Option<(String, bool)>,
}

impl AppState {
    /// Start a session over `dataset` with an initial selection (empty or
    /// restored from a bookmark).
    pub fn new(dataset: SpendDataset, selection: FilterSelection) -> Self {
        let facets = Facets::from_dataset(&dataset);
        let view = DashboardView::compute(&dataset, &selection);
        Self {
            dataset,
            facets,
            selection,
            view,
            status_message: None,
        }
    }

    /// Recompute the derived view after a selection change.
    pub fn recompute(&mut self) {
        self.view = DashboardView::compute(&self.dataset, &self.selection);
    }

    /// Set or clear one filter dimension.
    pub fn set_filter(&mut self, field: FilterField, value: Option<FacetValue>) {
        if self.selection.get(field) == value {
            return;
        }
        self.selection.set(field, value);
        self.recompute();
    }

    /// Drop every constraint.
    pub fn clear_filters(&mut self) {
        if !self.selection.is_empty() {
            self.selection = FilterSelection::default();
            self.recompute();
        }
    }

    /// Write the filtered records to `path` and report the outcome.
    pub fn export_to(&mut self, path: &Path) {
        match write_export(&self.dataset, &self.view.filtered, path) {
            Ok(()) => self.set_status(format!("Exported to {}", path.display()), false),
            Err(e)
                if matches!(
                    e.downcast_ref::<DashboardError>(),
                    Some(DashboardError::NothingToExport)
                ) =>
            {
                self.set_status("No data to download".to_string(), true);
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.set_status(format!("Error: {e:#}"), true);
            }
        }
    }

    /// Bookmark the current selection and report the outcome.
    pub fn bookmark<S>(&mut self, store: &mut S)
    where
        S: KeyValueStore + ?Sized,
    {
        match save_bookmark(store, &self.selection) {
            Ok(()) => self.set_status("Filters bookmarked!".to_string(), false),
            Err(e) => {
                log::error!("Bookmark failed: {e:#}");
                self.set_status(format!("Error: {e:#}"), true);
            }
        }
    }

    pub fn set_status(&mut self, message: String, is_error: bool) {
        self.status_message = Some((message, is_error));
    }
}
