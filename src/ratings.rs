use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

pub const MAX_RATING: u8 = 10;

/// Per-group badness ratings, `subject -> type -> group -> 0..=10`.
/// Mirrors the catalog's shape; this is the only mutable domain state and
/// the sole export artifact.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingStore(pub IndexMap<String, IndexMap<String, IndexMap<String, u8>>>);

impl RatingStore {
    /// One zero entry per (subject, type, group) triple in the catalog.
    pub fn init(catalog: &Catalog) -> Self {
        let mut store = IndexMap::new();
        for (subject, types) in &catalog.0 {
            let subject_entry: &mut IndexMap<String, IndexMap<String, u8>> =
                store.entry(subject.clone()).or_default();
            for (kind, groups) in types {
                let kind_entry = subject_entry.entry(kind.clone()).or_default();
                for group in groups.keys() {
                    kind_entry.insert(group.clone(), 0);
                }
            }
        }
        RatingStore(store)
    }

    pub fn get(&self, subject: &str, kind: &str, group: &str) -> u8 {
        self.0[subject][kind][group]
    }

    pub fn set(&mut self, subject: &str, kind: &str, group: &str, value: u8) {
        self.0[subject][kind][group] = value.min(MAX_RATING);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
