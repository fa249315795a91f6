use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::FilterSelection;
use crate::errors::DashboardError;

/// Key under which the bookmarked selection is stored.
pub const BOOKMARK_KEY: &str = "dashboardFilters";

// ---------------------------------------------------------------------------
// Key-value store abstraction
// ---------------------------------------------------------------------------

/// A string-keyed, string-valued persistent store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// eframe's app storage, persisted by eframe between runs.
impl KeyValueStore for dyn eframe::Storage + '_ {
    fn get(&self, key: &str) -> Option<String> {
        self.get_string(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.set_string(key, value);
        self.flush();
        Ok(())
    }
}

/// Store backed by a single JSON object on disk. Used by the CLI.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every stored entry. A missing file is an empty store; a file that is
    /// not a JSON object of strings is an error.
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        serde_json::from_str(&text)
            .with_context(|| format!("parsing store {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut all) => all.remove(key),
            Err(e) => {
                log::warn!("Ignoring unreadable store: {e:#}");
                None
            }
        }
    }

    /// Refuses to write over a file it cannot read, so other keys survive.
    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);
        let text = serde_json::to_string_pretty(&all)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

// ---------------------------------------------------------------------------
// Stored shape
// ---------------------------------------------------------------------------

/// Serialized form of a selection. Empty strings mean "no constraint";
/// the year is kept as text.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookmarkModel {
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    project_type: Option<String>,
    #[serde(default)]
    year: Option<YearModel>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum YearModel {
    Number(i64),
    Text(String),
}

impl From<&FilterSelection> for BookmarkModel {
    fn from(sel: &FilterSelection) -> Self {
        BookmarkModel {
            region: Some(sel.geography.clone().unwrap_or_default()),
            sector: Some(sel.sector.clone().unwrap_or_default()),
            project_type: Some(sel.project_type_group.clone().unwrap_or_default()),
            year: Some(YearModel::Text(
                sel.year.map(|y| y.to_string()).unwrap_or_default(),
            )),
        }
    }
}

impl BookmarkModel {
    fn into_selection(self) -> FilterSelection {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        let year = match self.year {
            None => None,
            Some(YearModel::Number(n)) => i32::try_from(n).ok().filter(|&y| y != 0),
            Some(YearModel::Text(s)) if s.trim().is_empty() => None,
            Some(YearModel::Text(s)) => match s.trim().parse::<i32>() {
                Ok(y) if y != 0 => Some(y),
                _ => {
                    log::warn!("Bookmarked year {s:?} is not a valid year; leaving it unset");
                    None
                }
            },
        };
        FilterSelection {
            geography: non_empty(self.region),
            sector: non_empty(self.sector),
            project_type_group: non_empty(self.project_type),
            year,
        }
    }
}

// ---------------------------------------------------------------------------
// Save / restore
// ---------------------------------------------------------------------------

/// Persist the four filter fields under [`BOOKMARK_KEY`].
pub fn save_bookmark<S>(store: &mut S, selection: &FilterSelection) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_string(&BookmarkModel::from(selection))?;
    store.set(BOOKMARK_KEY, value)?;
    log::info!("Bookmarked filters {selection:?}");
    Ok(())
}

/// Decode a stored bookmark value.
pub fn decode_bookmark(value: &str) -> Result<FilterSelection, DashboardError> {
    let model: BookmarkModel = serde_json::from_str(value)?;
    Ok(model.into_selection())
}

/// Selection to start a session with. A missing or malformed bookmark yields
/// the empty selection.
pub fn restore_bookmark<S>(store: &S) -> FilterSelection
where
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.get(BOOKMARK_KEY) else {
        return FilterSelection::default();
    };
    match decode_bookmark(&value) {
        Ok(selection) => {
            log::info!("Restored bookmarked filters {selection:?}");
            selection
        }
        Err(e) => {
            log::warn!("{e}; starting without filters");
            FilterSelection::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryStore(BTreeMap<String, String>);

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: String) -> Result<()> {
            self.0.insert(key.to_string(), value);
            Ok(())
        }
    }

    fn store_with(value: &str) -> MemoryStore {
        let mut store = MemoryStore::default();
        store.0.insert(BOOKMARK_KEY.to_string(), value.to_string());
        store
    }

    #[test]
    fn save_then_restore_reproduces_selection() {
        let selection = FilterSelection {
            geography: Some("West".into()),
            sector: None,
            project_type_group: Some("Capital Expansion".into()),
            year: Some(2021),
        };
        let mut store = MemoryStore::default();
        save_bookmark(&mut store, &selection).unwrap();

        // A new session only sees the store.
        assert_eq!(restore_bookmark(&store), selection);
    }

    #[test]
    fn stored_layout_uses_text_fields() {
        let mut store = MemoryStore::default();
        let selection = FilterSelection {
            year: Some(2020),
            ..Default::default()
        };
        save_bookmark(&mut store, &selection).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&store.0[BOOKMARK_KEY]).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({"region": "", "sector": "", "projectType": "", "year": "2020"})
        );
    }

    #[test]
    fn missing_key_restores_empty_selection() {
        assert_eq!(restore_bookmark(&MemoryStore::default()), FilterSelection::default());
    }

    #[test]
    fn missing_and_empty_fields_are_unconstrained() {
        let store = store_with(r#"{"region": "East", "sector": ""}"#);
        assert_eq!(
            restore_bookmark(&store),
            FilterSelection {
                geography: Some("East".into()),
                ..Default::default()
            }
        );

        let store = store_with(r#"{"year": 2019}"#);
        assert_eq!(restore_bookmark(&store).year, Some(2019));
    }

    #[test]
    fn malformed_bookmark_falls_back_to_unconstrained() {
        assert_eq!(restore_bookmark(&store_with("not json")), FilterSelection::default());
        assert_eq!(
            restore_bookmark(&store_with(r#"{"region": 12, "sector": "Energy"}"#)),
            FilterSelection::default()
        );

        // A bad year only drops the year.
        let restored = restore_bookmark(&store_with(r#"{"sector": "Energy", "year": "twenty"}"#));
        assert_eq!(restored.sector.as_deref(), Some("Energy"));
        assert_eq!(restored.year, None);
    }

    #[test]
    fn json_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "forecast-dashboard-bookmark-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get(BOOKMARK_KEY), None);

        let selection = FilterSelection {
            sector: Some("Mining".into()),
            ..Default::default()
        };
        save_bookmark(&mut store, &selection).unwrap();
        store.set("other", "kept".into()).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(restore_bookmark(&reopened), selection);
        assert_eq!(reopened.get("other").as_deref(), Some("kept"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json_file_store_keeps_unreadable_file_intact() {
        let path = std::env::temp_dir().join(format!(
            "forecast-dashboard-corrupt-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{\"other\": \"kept\"").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get(BOOKMARK_KEY), None);
        assert_eq!(restore_bookmark(&store), FilterSelection::default());
        assert!(save_bookmark(&mut store, &FilterSelection::default()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"other\": \"kept\"");

        let _ = std::fs::remove_file(&path);
    }
}
