use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::category::PermissionCategory;
use crate::entry::PermissionEntry;

/// Permission entries grouped by category.
///
/// All eight categories are always present; a category with nothing in it is
/// an empty slice, never a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMap {
    entries: [Vec<PermissionEntry>; 8],
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of one category, in insertion order.
    pub fn get(&self, category: PermissionCategory) -> &[PermissionEntry] {
        &self.entries[category.index()]
    }

    /// Append an entry to its own category.
    pub fn push(&mut self, entry: PermissionEntry) {
        self.entries[entry.category().index()].push(entry);
    }

    /// Replace one category wholesale.
    pub fn set(&mut self, category: PermissionCategory, entries: Vec<PermissionEntry>) {
        debug_assert!(entries.iter().all(|e| e.category() == category));
        self.entries[category.index()] = entries;
    }

    /// Categories paired with their entries, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (PermissionCategory, &[PermissionEntry])> {
        PermissionCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Number of entries in `category`.
    pub fn count(&self, category: PermissionCategory) -> usize {
        self.get(category).len()
    }

    /// Number of entries across all categories.
    pub fn total(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// A map holding only `category`'s entries.
    pub fn only(&self, category: PermissionCategory) -> Self {
        let mut out = Self::new();
        out.set(category, self.get(category).to_vec());
        out
    }

    /// Categories that hold at least one entry.
    pub fn populated(&self) -> impl Iterator<Item = PermissionCategory> + '_ {
        self.iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(category, _)| category)
    }
}

impl Serialize for PermissionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, entries) in self.iter() {
            map.serialize_entry(category.key(), entries)?;
        }
        map.end()
    }
}

/// A profile reduced to its permission entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProfile {
    /// Source identifier, unique within one batch.
    pub name: String,
    pub permissions: PermissionMap,
}

impl NormalizedProfile {
    pub fn new(name: impl Into<String>, permissions: PermissionMap) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }

    /// A profile with no permissions, used when a source document is unusable.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, PermissionMap::new())
    }
}
