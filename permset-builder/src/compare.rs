//! Side-by-side comparison of two profiles' permissions.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::category::PermissionCategory;
use crate::entry::PermissionEntry;
use crate::permissions::NormalizedProfile;

/// One field whose value differs between two entries with the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDifference {
    pub field: &'static str,
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangedEntry {
    pub identity: String,
    pub differences: Vec<FieldDifference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryComparison {
    pub category: PermissionCategory,
    /// Identities whose entries are equal on both sides.
    pub shared: Vec<String>,
    pub changed: Vec<ChangedEntry>,
    pub only_left: Vec<String>,
    pub only_right: Vec<String>,
}

impl CategoryComparison {
    pub fn has_differences(&self) -> bool {
        !(self.changed.is_empty() && self.only_left.is_empty() && self.only_right.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileComparison {
    pub left: String,
    pub right: String,
    pub categories: Vec<CategoryComparison>,
}

impl ProfileComparison {
    pub fn is_identical(&self) -> bool {
        self.categories.iter().all(|c| !c.has_differences())
    }
}

/// Compare two profiles category by category.
///
/// Entries are paired by identity key. When a profile repeats an identity,
/// the first occurrence is compared. `only` restricts the comparison to a
/// single category.
pub fn compare(
    left: &NormalizedProfile,
    right: &NormalizedProfile,
    only: Option<PermissionCategory>,
) -> ProfileComparison {
    let categories = PermissionCategory::ALL
        .into_iter()
        .filter(|category| only.map_or(true, |wanted| wanted == *category))
        .map(|category| {
            compare_category(
                category,
                left.permissions.get(category),
                right.permissions.get(category),
            )
        })
        .collect();

    ProfileComparison {
        left: left.name.clone(),
        right: right.name.clone(),
        categories,
    }
}

fn compare_category(
    category: PermissionCategory,
    left: &[PermissionEntry],
    right: &[PermissionEntry],
) -> CategoryComparison {
    let mut right_by_key: HashMap<&str, &PermissionEntry> = HashMap::new();
    for entry in right {
        right_by_key.entry(entry.identity_key()).or_insert(entry);
    }

    let mut result = CategoryComparison {
        category,
        shared: Vec::new(),
        changed: Vec::new(),
        only_left: Vec::new(),
        only_right: Vec::new(),
    };

    let mut left_keys = HashSet::new();
    for entry in left {
        let key = entry.identity_key();
        if !left_keys.insert(key) {
            continue;
        }
        match right_by_key.get(key) {
            None => result.only_left.push(key.to_string()),
            Some(other) if entry == *other => result.shared.push(key.to_string()),
            Some(other) => result.changed.push(ChangedEntry {
                identity: key.to_string(),
                differences: field_differences(entry, other),
            }),
        }
    }

    let mut right_keys = HashSet::new();
    for entry in right {
        let key = entry.identity_key();
        if !left_keys.contains(key) && right_keys.insert(key) {
            result.only_right.push(key.to_string());
        }
    }

    result
}

fn field_differences(left: &PermissionEntry, right: &PermissionEntry) -> Vec<FieldDifference> {
    left.fields()
        .zip(right.fields())
        .filter(|((_, l), (_, r))| l != r)
        .map(|((spec, l), (_, r))| FieldDifference {
            field: spec.name,
            left: l.as_xml_text(),
            right: r.as_xml_text(),
        })
        .collect()
}
