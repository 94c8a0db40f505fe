use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::PermissionCategory;
use crate::generate::OutputArtifact;
use crate::permissions::{NormalizedProfile, PermissionMap};

/// Entry counts per category plus their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionStats {
    pub counts: BTreeMap<PermissionCategory, usize>,
    pub total: usize,
}

impl PermissionStats {
    pub fn of(permissions: &PermissionMap) -> Self {
        Self {
            counts: permissions
                .iter()
                .map(|(category, entries)| (category, entries.len()))
                .collect(),
            total: permissions.total(),
        }
    }

    pub fn count(&self, category: PermissionCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }
}

/// Totals for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub profiles_processed: usize,
    pub artifacts_generated: usize,
    /// Source entries across all input profiles, before reconciliation.
    pub source_permissions: usize,
    pub source_by_category: BTreeMap<PermissionCategory, usize>,
    /// Entries written across all artifacts.
    pub output_permissions: usize,
}

pub fn summarize_run(profiles: &[NormalizedProfile], artifacts: &[OutputArtifact]) -> RunSummary {
    let mut source_by_category: BTreeMap<PermissionCategory, usize> = PermissionCategory::ALL
        .into_iter()
        .map(|category| (category, 0))
        .collect();
    for profile in profiles {
        for (category, entries) in profile.permissions.iter() {
            *source_by_category.entry(category).or_default() += entries.len();
        }
    }

    RunSummary {
        profiles_processed: profiles.len(),
        artifacts_generated: artifacts.len(),
        source_permissions: source_by_category.values().sum(),
        source_by_category,
        output_permissions: artifacts.iter().map(|a| a.stats.total).sum(),
    }
}
