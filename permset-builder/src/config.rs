use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::category::{CategoryLabels, PermissionCategory};
use crate::naming::is_valid_file_name;

/// Text templates for permission set descriptions.
///
/// `{profile}` and `{label}` are replaced when a description is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionTemplates {
    pub single: String,
    pub split: String,
    pub unified: String,
    pub common: String,
    pub specific: String,
}

impl DescriptionTemplates {
    /// Expand placeholders in one left-to-right pass. Substituted text is
    /// never scanned again, and unknown `{...}` sequences are kept verbatim.
    pub fn render(template: &str, profile: &str, label: &str) -> String {
        let mut out = String::with_capacity(template.len() + profile.len() + label.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix("{profile}") {
                out.push_str(profile);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{label}") {
                out.push_str(label);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}

/// Static configuration consumed by naming and document generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub labels: CategoryLabels,
    pub descriptions: DescriptionTemplates,
}

impl Default for BuildConfig {
    fn default() -> Self {
        default_config()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    descriptions: DescriptionOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptionOverrides {
    single: Option<String>,
    split: Option<String>,
    unified: Option<String>,
    common: Option<String>,
    specific: Option<String>,
}

/// Errors returned when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("config file {path} names unknown permission category '{key}'")]
    UnknownCategory { path: String, key: String },
    #[error("config file {path} sets invalid label '{label}' for '{key}'")]
    InvalidLabel {
        path: String,
        key: String,
        label: String,
    },
}

/// Load a TOML config file. Keys it leaves out keep their default values.
pub fn load_config(path: &Path) -> Result<BuildConfig, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    apply_config(default_config(), &raw, path.display().to_string())
}

/// Built-in configuration from the embedded `config/default.toml`.
pub fn default_config() -> BuildConfig {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));
    apply_config(fallback_config(), embedded, "embedded config".to_string())
        .unwrap_or_else(|_| fallback_config())
}

fn apply_config(
    mut config: BuildConfig,
    raw: &str,
    path: String,
) -> Result<BuildConfig, ConfigLoadError> {
    let parsed: ConfigFile = toml::from_str(raw).map_err(|source| ConfigLoadError::Parse {
        path: path.clone(),
        source,
    })?;

    for (key, label) in parsed.labels {
        let category = key
            .parse::<PermissionCategory>()
            .map_err(|_| ConfigLoadError::UnknownCategory {
                path: path.clone(),
                key: key.clone(),
            })?;
        if !is_valid_file_name(&label) {
            return Err(ConfigLoadError::InvalidLabel {
                path: path.clone(),
                key,
                label,
            });
        }
        config.labels = config.labels.with_label(category, label);
    }

    let overrides = parsed.descriptions;
    let templates = &mut config.descriptions;
    for (slot, value) in [
        (&mut templates.single, overrides.single),
        (&mut templates.split, overrides.split),
        (&mut templates.unified, overrides.unified),
        (&mut templates.common, overrides.common),
        (&mut templates.specific, overrides.specific),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }

    Ok(config)
}

fn fallback_config() -> BuildConfig {
    BuildConfig {
        labels: CategoryLabels::default(),
        descriptions: DescriptionTemplates {
            single: "Permission set generated from profile {profile}".to_string(),
            split: "{label} from profile {profile}".to_string(),
            unified: "Unified permission set generated from multiple profiles".to_string(),
            common: "Permissions shared by all profiles".to_string(),
            specific: "Permissions specific to profile {profile}".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{
        apply_config, default_config, fallback_config, load_config, ConfigLoadError,
        DescriptionTemplates,
    };
    use crate::category::PermissionCategory;

    #[test]
    fn embedded_config_matches_fallback() {
        assert_eq!(default_config(), fallback_config());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("permset.toml");
        fs::write(
            &path,
            r#"
[labels]
applicationVisibilities = "Apps"

[descriptions]
single = "Migrated from {profile}"
"#,
        )
        .expect("write config");

        let config = load_config(&path).expect("config should load");
        assert_eq!(
            config.labels.get(PermissionCategory::ApplicationVisibility),
            "Apps"
        );
        assert_eq!(
            config.labels.get(PermissionCategory::ObjectPermission),
            "ObjectAccess"
        );
        assert_eq!(config.descriptions.single, "Migrated from {profile}");
        assert_eq!(
            config.descriptions.common,
            fallback_config().descriptions.common
        );
    }

    #[test]
    fn unknown_category_key_is_rejected() {
        let err = apply_config(
            fallback_config(),
            "[labels]\nflows = \"Flows\"\n",
            "test".to_string(),
        )
        .expect_err("unknown category");
        assert!(matches!(err, ConfigLoadError::UnknownCategory { key, .. } if key == "flows"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = apply_config(fallback_config(), "labels = [", "test".to_string())
            .expect_err("broken toml");
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn label_with_path_characters_is_rejected() {
        let err = apply_config(
            fallback_config(),
            "[labels]\nuserPermissions = \"x/../../escaped\"\n",
            "test".to_string(),
        )
        .expect_err("label is not a file name");
        assert!(matches!(
            err,
            ConfigLoadError::InvalidLabel { key, label, .. }
                if key == "userPermissions" && label == "x/../../escaped"
        ));

        let err = apply_config(
            fallback_config(),
            "[labels]\nuserPermissions = \"  \"\n",
            "test".to_string(),
        )
        .expect_err("blank label");
        assert!(matches!(err, ConfigLoadError::InvalidLabel { .. }));
    }

    #[test]
    fn render_does_not_expand_substituted_text() {
        assert_eq!(
            DescriptionTemplates::render(
                "Permission set generated from profile {profile}",
                "X{label}",
                "Tabs"
            ),
            "Permission set generated from profile X{label}"
        );
        assert_eq!(
            DescriptionTemplates::render(
                "{label} from profile {profile}",
                "X{label}",
                "{profile}"
            ),
            "{profile} from profile X{label}"
        );
    }

    #[test]
    fn render_keeps_unknown_braces() {
        assert_eq!(
            DescriptionTemplates::render("{owner} {profile} {", "Admin", ""),
            "{owner} Admin {"
        );
    }

    #[test]
    fn render_substitutes_placeholders() {
        assert_eq!(
            DescriptionTemplates::render("{label} from profile {profile}", "Admin", "PageAccess"),
            "PageAccess from profile Admin"
        );
    }
}
