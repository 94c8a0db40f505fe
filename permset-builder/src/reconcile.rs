//! Union, intersection and complement of profile permissions.
//!
//! Categories are reconciled independently. Union deduplicates on identity
//! alone (first profile wins); intersection and complement require identity
//! plus full field equality, which is what makes
//! `intersect ∪ complement(p) == p` hold for every profile.

use std::collections::{HashMap, HashSet};

use crate::category::PermissionCategory;
use crate::entry::PermissionEntry;
use crate::permissions::{NormalizedProfile, PermissionMap};

/// Deduplicated union of all profiles.
///
/// For each category, profiles are visited in input order and the first entry
/// seen for an identity key is kept. Later entries with the same key are
/// dropped even when their flags differ.
pub fn unify(profiles: &[NormalizedProfile]) -> PermissionMap {
    let mut out = PermissionMap::new();

    for category in PermissionCategory::ALL {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut kept = Vec::new();
        for profile in profiles {
            for entry in profile.permissions.get(category) {
                if seen.insert(entry.identity_key()) {
                    kept.push(entry.clone());
                }
            }
        }
        out.set(category, kept);
    }

    out
}

/// Entries shared, field for field, by every profile.
///
/// With no profiles the result is empty; with one it is that profile's
/// permissions. Otherwise the first profile's order is preserved.
pub fn intersect(profiles: &[NormalizedProfile]) -> PermissionMap {
    let Some((first, rest)) = profiles.split_first() else {
        return PermissionMap::new();
    };
    if rest.is_empty() {
        return first.permissions.clone();
    }

    let mut out = PermissionMap::new();
    for category in PermissionCategory::ALL {
        let others: Vec<IdentityIndex<'_>> = rest
            .iter()
            .map(|profile| IdentityIndex::new(profile.permissions.get(category)))
            .collect();

        let common = first
            .permissions
            .get(category)
            .iter()
            .filter(|entry| others.iter().all(|index| index.contains_match(entry)))
            .cloned()
            .collect();
        out.set(category, common);
    }

    out
}

/// Entries of `permissions` that have no exact match in `common`.
pub fn complement(permissions: &PermissionMap, common: &PermissionMap) -> PermissionMap {
    let mut out = PermissionMap::new();
    for category in PermissionCategory::ALL {
        let index = IdentityIndex::new(common.get(category));
        let specific = permissions
            .get(category)
            .iter()
            .filter(|entry| !index.contains_match(entry))
            .cloned()
            .collect();
        out.set(category, specific);
    }
    out
}

/// Common permissions plus each profile's specific remainder, in input order.
pub fn partition(profiles: &[NormalizedProfile]) -> (PermissionMap, Vec<PermissionMap>) {
    let common = intersect(profiles);
    let specifics = profiles
        .iter()
        .map(|profile| complement(&profile.permissions, &common))
        .collect();
    (common, specifics)
}

/// Entries of one category bucketed by identity key.
struct IdentityIndex<'a> {
    by_key: HashMap<&'a str, Vec<&'a PermissionEntry>>,
}

impl<'a> IdentityIndex<'a> {
    fn new(entries: &'a [PermissionEntry]) -> Self {
        let mut by_key: HashMap<&'a str, Vec<&'a PermissionEntry>> = HashMap::new();
        for entry in entries {
            by_key.entry(entry.identity_key()).or_default().push(entry);
        }
        Self { by_key }
    }

    fn contains_match(&self, entry: &PermissionEntry) -> bool {
        self.by_key
            .get(entry.identity_key())
            .is_some_and(|candidates| candidates.iter().any(|c| c.matches(entry)))
    }
}
