//! Output names for generated permission sets.
//!
//! Resolution order, most specific first:
//! 1. split mode only: `splitOverrides["<profile>_<categoryKey>"]`, verbatim;
//! 2. the profile's base name from the mapping (split mode appends
//!    `_<label>`);
//! 3. the mode default.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::category::{CategoryLabels, PermissionCategory};
use crate::mode::GenerationMode;

/// Name of the unified permission set when no mapping applies.
pub const UNIFIED_NAME: &str = "UnifiedPermissions";
/// Profile name passed to the resolver for the unified set.
pub const UNIFIED_SENTINEL: &str = "Unified";
/// Profile name passed to the resolver for the common set.
pub const COMMON_SENTINEL: &str = "Common";

const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// User-supplied output name overrides.
///
/// JSON shape:
/// `{ "<profile>": "<base>", "splitOverrides": { "<profile>_<categoryKey>": "<name>" } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NameMapping {
    #[serde(rename = "splitOverrides", default)]
    pub split_overrides: BTreeMap<String, String>,
    #[serde(flatten)]
    pub profiles: BTreeMap<String, String>,
}

/// Errors returned when loading or validating a name mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("failed to read name mapping {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse name mapping {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid permission set name '{name}' for key '{key}'")]
    InvalidName { key: String, name: String },
}

impl NameMapping {
    /// Load and validate a mapping from a JSON file.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let raw = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, path.display().to_string())
    }

    /// Parse and validate a mapping from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, MappingError> {
        Self::parse(raw, "inline mapping".to_string())
    }

    fn parse(raw: &str, path: String) -> Result<Self, MappingError> {
        let mapping: NameMapping =
            serde_json::from_str(raw).map_err(|source| MappingError::Parse { path, source })?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Reject names that cannot be used as file names.
    pub fn validate(&self) -> Result<(), MappingError> {
        let all = self.profiles.iter().chain(self.split_overrides.iter());
        for (key, name) in all {
            if !is_valid_file_name(name) {
                return Err(MappingError::InvalidName {
                    key: key.clone(),
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Base name configured for `profile`.
    pub fn base_name(&self, profile: &str) -> Option<&str> {
        non_empty(self.profiles.get(profile))
    }

    /// Split override configured for `profile` and `category`.
    pub fn split_override(&self, profile: &str, category: PermissionCategory) -> Option<&str> {
        non_empty(self.split_overrides.get(&split_key(profile, category)))
    }
}

/// Key used in `splitOverrides` for a profile and category.
pub fn split_key(profile: &str, category: PermissionCategory) -> String {
    format!("{profile}_{}", category.key())
}

/// Resolve the output name for a profile.
///
/// `category` only matters in split mode; a split request without one is
/// named like a single-mode set.
pub fn resolve_name(
    profile: &str,
    mapping: Option<&NameMapping>,
    mode: GenerationMode,
    category: Option<PermissionCategory>,
    labels: &CategoryLabels,
) -> String {
    let split_category = category.filter(|_| mode == GenerationMode::Split);

    if let (Some(mapping), Some(category)) = (mapping, split_category) {
        if let Some(name) = mapping.split_override(profile, category) {
            return name.to_string();
        }
    }

    if let Some(base) = mapping.and_then(|m| m.base_name(profile)) {
        return match split_category {
            Some(category) => format!("{base}_{}", labels.get(category)),
            None => base.to_string(),
        };
    }

    default_name(profile, mode, split_category, labels)
}

fn default_name(
    profile: &str,
    mode: GenerationMode,
    split_category: Option<PermissionCategory>,
    labels: &CategoryLabels,
) -> String {
    match mode {
        GenerationMode::Single => profile.to_string(),
        GenerationMode::Split => match split_category {
            Some(category) => format!("{profile}_{}", labels.get(category)),
            None => profile.to_string(),
        },
        GenerationMode::Unified => UNIFIED_NAME.to_string(),
        GenerationMode::BaseSpecific if profile == COMMON_SENTINEL => COMMON_SENTINEL.to_string(),
        GenerationMode::BaseSpecific => profile.to_string(),
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Whether `name` can be used as a permission set file name: not blank and
/// free of path separators and characters reserved on common file systems.
pub fn is_valid_file_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(INVALID_NAME_CHARS)
}
