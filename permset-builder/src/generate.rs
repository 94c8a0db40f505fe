//! Turn normalized profiles into permission set artifacts.
//!
//! Each [`GenerationMode`] is one strategy over the reconciliation engine.
//! Artifacts come out in a deterministic order: profiles in input order,
//! categories in output order, the common set before any specific set.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::category::PermissionCategory;
use crate::config::{BuildConfig, DescriptionTemplates};
use crate::document::{file_name, render, PermissionSetSpec};
use crate::mode::GenerationMode;
use crate::naming::{
    is_valid_file_name, resolve_name, NameMapping, COMMON_SENTINEL, UNIFIED_SENTINEL,
};
use crate::permissions::{NormalizedProfile, PermissionMap};
use crate::reconcile::{partition, unify};
use crate::stats::PermissionStats;

/// Invalid caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(
        "unsupported generation mode '{0}' (expected one of: single, split, unified, base+specific)"
    )]
    UnsupportedMode(String),
    #[error("no profiles to convert")]
    NoProfiles,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("permission sets from '{first}' and '{second}' would both be written to {filename}")]
    NameCollision {
        filename: String,
        first: String,
        second: String,
    },
    #[error("permission set name '{name}' from '{origin}' cannot be used as a file name")]
    InvalidName { name: String, origin: String },
    #[error("failed to render permission set: {0}")]
    Render(#[from] metadata_xml::WriteError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Keep artifacts that share a file name instead of failing. The later
    /// artifact wins when they are written to the same directory.
    pub allow_collisions: bool,
}

/// What an artifact was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Profile,
    Category(PermissionCategory),
    Unified,
    Common,
    Specific,
}

/// One generated permission set document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    pub name: String,
    /// File name including the `.permissionset-meta.xml` suffix.
    pub filename: String,
    #[serde(skip)]
    pub content: String,
    pub stats: PermissionStats,
    /// Names of the profiles that contributed to this artifact.
    pub sources: Vec<String>,
    pub kind: ArtifactKind,
}

/// Generate permission sets from `profiles`.
pub fn generate(
    profiles: &[NormalizedProfile],
    mode: GenerationMode,
    mapping: Option<&NameMapping>,
    config: &BuildConfig,
    options: GenerateOptions,
) -> Result<Vec<OutputArtifact>, GenerateError> {
    if profiles.is_empty() {
        return Err(InputError::NoProfiles.into());
    }
    info!(%mode, profiles = profiles.len(), "generating permission sets");

    let planner = Planner {
        mode,
        mapping,
        config,
    };
    let artifacts = match mode {
        GenerationMode::Single => planner.single(profiles)?,
        GenerationMode::Split => planner.split(profiles)?,
        GenerationMode::Unified => planner.unified(profiles)?,
        GenerationMode::BaseSpecific => planner.base_specific(profiles)?,
    };

    check_collisions(&artifacts, options)?;
    info!(artifacts = artifacts.len(), "generation complete");
    Ok(artifacts)
}

struct Planner<'a> {
    mode: GenerationMode,
    mapping: Option<&'a NameMapping>,
    config: &'a BuildConfig,
}

impl Planner<'_> {
    fn single(&self, profiles: &[NormalizedProfile]) -> Result<Vec<OutputArtifact>, GenerateError> {
        profiles
            .iter()
            .map(|profile| {
                let name = self.name(&profile.name, None);
                let description =
                    self.describe(&self.config.descriptions.single, &profile.name, "");
                artifact(
                    name,
                    &description,
                    &profile.permissions,
                    vec![profile.name.clone()],
                    ArtifactKind::Profile,
                )
            })
            .collect()
    }

    fn split(&self, profiles: &[NormalizedProfile]) -> Result<Vec<OutputArtifact>, GenerateError> {
        let mut out = Vec::new();
        for profile in profiles {
            let categories: Vec<_> = profile.permissions.populated().collect();
            if categories.is_empty() {
                debug!(profile = %profile.name, "profile has no permissions; nothing to split");
            }
            for category in categories {
                let name = self.name(&profile.name, Some(category));
                let label = self.config.labels.get(category);
                let description =
                    self.describe(&self.config.descriptions.split, &profile.name, label);
                out.push(artifact(
                    name,
                    &description,
                    &profile.permissions.only(category),
                    vec![profile.name.clone()],
                    ArtifactKind::Category(category),
                )?);
            }
        }
        Ok(out)
    }

    fn unified(
        &self,
        profiles: &[NormalizedProfile],
    ) -> Result<Vec<OutputArtifact>, GenerateError> {
        let merged = unify(profiles);
        let name = self.name(UNIFIED_SENTINEL, None);
        let description =
            self.describe(&self.config.descriptions.unified, UNIFIED_SENTINEL, "");
        let sources = profiles.iter().map(|p| p.name.clone()).collect();
        Ok(vec![artifact(
            name,
            &description,
            &merged,
            sources,
            ArtifactKind::Unified,
        )?])
    }

    fn base_specific(
        &self,
        profiles: &[NormalizedProfile],
    ) -> Result<Vec<OutputArtifact>, GenerateError> {
        let (common, specifics) = partition(profiles);
        let mut out = Vec::with_capacity(profiles.len() + 1);

        let description = self.describe(&self.config.descriptions.common, COMMON_SENTINEL, "");
        out.push(artifact(
            self.name(COMMON_SENTINEL, None),
            &description,
            &common,
            profiles.iter().map(|p| p.name.clone()).collect(),
            ArtifactKind::Common,
        )?);

        for (profile, specific) in profiles.iter().zip(&specifics) {
            if specific.is_empty() {
                debug!(profile = %profile.name, "no profile-specific permissions");
                continue;
            }
            let description =
                self.describe(&self.config.descriptions.specific, &profile.name, "");
            out.push(artifact(
                self.name(&profile.name, None),
                &description,
                specific,
                vec![profile.name.clone()],
                ArtifactKind::Specific,
            )?);
        }
        Ok(out)
    }

    fn name(&self, profile: &str, category: Option<PermissionCategory>) -> String {
        resolve_name(
            profile,
            self.mapping,
            self.mode,
            category,
            &self.config.labels,
        )
    }

    fn describe(&self, template: &str, profile: &str, label: &str) -> String {
        DescriptionTemplates::render(template, profile, label)
    }
}

fn artifact(
    name: String,
    description: &str,
    permissions: &PermissionMap,
    sources: Vec<String>,
    kind: ArtifactKind,
) -> Result<OutputArtifact, GenerateError> {
    if !is_valid_file_name(&name) {
        return Err(GenerateError::InvalidName {
            name,
            origin: sources.join(", "),
        });
    }
    let content = render(&PermissionSetSpec {
        name: &name,
        label: &name,
        description,
        permissions,
    })?;
    debug!(permission_set = %name, entries = permissions.total(), "rendered permission set");
    Ok(OutputArtifact {
        filename: file_name(&name),
        name,
        content,
        stats: PermissionStats::of(permissions),
        sources,
        kind,
    })
}

fn check_collisions(
    artifacts: &[OutputArtifact],
    options: GenerateOptions,
) -> Result<(), GenerateError> {
    let mut seen: HashMap<&str, &OutputArtifact> = HashMap::new();
    for artifact in artifacts {
        let Some(first) = seen.insert(&artifact.filename, artifact) else {
            continue;
        };
        let first = origin(first);
        let second = origin(artifact);
        if !options.allow_collisions {
            return Err(GenerateError::NameCollision {
                filename: artifact.filename.clone(),
                first,
                second,
            });
        }
        warn!(
            filename = %artifact.filename,
            %first,
            %second,
            "duplicate permission set file name; the later artifact overwrites the earlier"
        );
    }
    Ok(())
}

fn origin(artifact: &OutputArtifact) -> String {
    match artifact.kind {
        ArtifactKind::Category(category) => {
            format!("{} ({category})", artifact.sources.join(", "))
        }
        ArtifactKind::Unified => UNIFIED_SENTINEL.to_string(),
        ArtifactKind::Common => COMMON_SENTINEL.to_string(),
        ArtifactKind::Profile | ArtifactKind::Specific => artifact.sources.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use metadata_xml::parse_str;
    use pretty_assertions::assert_eq;

    use super::{
        generate, ArtifactKind, GenerateError, GenerateOptions, InputError, OutputArtifact,
    };
    use crate::category::PermissionCategory;
    use crate::config::BuildConfig;
    use crate::entry::PermissionEntry;
    use crate::mode::GenerationMode;
    use crate::naming::NameMapping;
    use crate::permissions::{NormalizedProfile, PermissionMap};
    use crate::source::{load_profiles, MemorySource, ProfileDocument};

    fn account(create: &str) -> PermissionEntry {
        PermissionEntry::from_pairs(
            PermissionCategory::ObjectPermission,
            &[("object", "Account"), ("allowCreate", create), ("allowRead", "true")],
        )
    }

    fn object(name: &str) -> PermissionEntry {
        PermissionEntry::from_pairs(
            PermissionCategory::ObjectPermission,
            &[("object", name), ("allowRead", "true")],
        )
    }

    fn user(name: &str) -> PermissionEntry {
        PermissionEntry::from_pairs(
            PermissionCategory::UserPermission,
            &[("name", name), ("enabled", "true")],
        )
    }

    fn profile(name: &str, entries: Vec<PermissionEntry>) -> NormalizedProfile {
        let mut permissions = PermissionMap::new();
        for entry in entries {
            permissions.push(entry);
        }
        NormalizedProfile::new(name, permissions)
    }

    fn run(
        profiles: &[NormalizedProfile],
        mode: GenerationMode,
        mapping: Option<&NameMapping>,
    ) -> Vec<OutputArtifact> {
        generate(
            profiles,
            mode,
            mapping,
            &BuildConfig::default(),
            GenerateOptions::default(),
        )
        .expect("generate")
    }

    fn names(artifacts: &[OutputArtifact]) -> Vec<&str> {
        artifacts.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = generate(
            &[],
            GenerationMode::Single,
            None,
            &BuildConfig::default(),
            GenerateOptions::default(),
        )
        .expect_err("no profiles");
        assert!(matches!(err, GenerateError::Input(InputError::NoProfiles)));
    }

    #[test]
    fn single_emits_one_artifact_per_profile() {
        let profiles = vec![
            profile("Admin", vec![account("true"), user("ApiEnabled")]),
            profile("Standard", vec![object("Contact")]),
        ];
        let artifacts = run(&profiles, GenerationMode::Single, None);

        assert_eq!(names(&artifacts), vec!["Admin", "Standard"]);
        let admin = &artifacts[0];
        assert_eq!(admin.filename, "Admin.permissionset-meta.xml");
        assert_eq!(admin.kind, ArtifactKind::Profile);
        assert_eq!(admin.stats.total, 2);

        let root = parse_str(&admin.content).expect("valid xml");
        assert_eq!(root.child_text("label"), Some("Admin"));
        assert_eq!(
            root.child_text("description"),
            Some("Permission set generated from profile Admin")
        );
    }

    #[test]
    fn split_emits_only_populated_categories() {
        let profiles = vec![profile(
            "Sales",
            vec![object("Account"), object("Contact"), object("Lead")],
        )];
        let artifacts = run(&profiles, GenerationMode::Split, None);

        assert_eq!(names(&artifacts), vec!["Sales_ObjectAccess"]);
        assert_eq!(
            artifacts[0].kind,
            ArtifactKind::Category(PermissionCategory::ObjectPermission)
        );
        assert_eq!(artifacts[0].stats.total, 3);
        let root = parse_str(&artifacts[0].content).expect("valid xml");
        assert_eq!(
            root.child_text("description"),
            Some("ObjectAccess from profile Sales")
        );
    }

    #[test]
    fn split_artifacts_cover_the_whole_profile() {
        let admin = profile("Admin", vec![account("true"), object("Contact"), user("ApiEnabled")]);
        let artifacts = run(std::slice::from_ref(&admin), GenerationMode::Split, None);

        let covered: usize = artifacts.iter().map(|a| a.stats.total).sum();
        assert_eq!(covered, admin.permissions.total());
        assert_eq!(names(&artifacts), vec!["Admin_ObjectAccess", "Admin_UserPermissions"]);
    }

    #[test]
    fn split_applies_overrides_before_base_names() {
        let mapping = NameMapping::from_json(
            r#"{"Admin":"AdminBase","splitOverrides":{"Admin_userPermissions":"AdminUserOverride"}}"#,
        )
        .expect("mapping");
        let profiles = vec![profile("Admin", vec![account("true"), user("ApiEnabled")])];
        let artifacts = run(&profiles, GenerationMode::Split, Some(&mapping));

        assert_eq!(
            names(&artifacts),
            vec!["AdminBase_ObjectAccess", "AdminUserOverride"]
        );
    }

    #[test]
    fn unified_keeps_first_profile_version() {
        let profiles = vec![
            profile("A", vec![account("true")]),
            profile("B", vec![account("false"), object("Contact")]),
        ];
        let artifacts = run(&profiles, GenerationMode::Unified, None);

        assert_eq!(names(&artifacts), vec!["UnifiedPermissions"]);
        let unified = &artifacts[0];
        assert_eq!(unified.sources, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(unified.stats.total, 2);

        let root = parse_str(&unified.content).expect("valid xml");
        let account = root
            .get_children("objectPermissions")
            .find(|node| node.child_text("object") == Some("Account"))
            .expect("account entry");
        assert_eq!(account.child_text("allowCreate"), Some("true"));
    }

    #[test]
    fn base_specific_separates_differing_entries() {
        let profiles = vec![
            profile("A", vec![account("true"), user("ApiEnabled")]),
            profile("B", vec![account("false"), user("ApiEnabled")]),
        ];
        let artifacts = run(&profiles, GenerationMode::BaseSpecific, None);

        assert_eq!(names(&artifacts), vec!["Common", "A", "B"]);
        let common = &artifacts[0];
        assert_eq!(common.kind, ArtifactKind::Common);
        assert_eq!(common.stats.count(PermissionCategory::ObjectPermission), 0);
        assert_eq!(common.stats.count(PermissionCategory::UserPermission), 1);

        for specific in &artifacts[1..] {
            assert_eq!(specific.kind, ArtifactKind::Specific);
            assert_eq!(specific.stats.total, 1);
            assert_eq!(specific.stats.count(PermissionCategory::ObjectPermission), 1);
        }
        let root = parse_str(&artifacts[1].content).expect("valid xml");
        assert_eq!(
            root.child_text("description"),
            Some("Permissions specific to profile A")
        );
    }

    #[test]
    fn base_specific_with_one_profile_emits_only_common() {
        let profiles = vec![profile("Solo", vec![account("true"), user("ApiEnabled")])];
        let artifacts = run(&profiles, GenerationMode::BaseSpecific, None);

        assert_eq!(names(&artifacts), vec!["Common"]);
        assert_eq!(artifacts[0].stats.total, 2);
    }

    #[test]
    fn base_specific_always_emits_common_even_when_empty() {
        let profiles = vec![
            profile("A", vec![object("Account")]),
            profile("B", vec![object("Contact")]),
        ];
        let artifacts = run(&profiles, GenerationMode::BaseSpecific, None);

        assert_eq!(names(&artifacts), vec!["Common", "A", "B"]);
        assert_eq!(artifacts[0].stats.total, 0);
    }

    #[test]
    fn output_is_deterministic() {
        let profiles = vec![
            profile("A", vec![account("true"), user("ApiEnabled")]),
            profile("B", vec![account("false"), object("Contact")]),
        ];
        for mode in GenerationMode::ALL {
            assert_eq!(run(&profiles, mode, None), run(&profiles, mode, None));
        }
    }

    #[test]
    fn duplicate_file_names_are_rejected_by_default() {
        let profiles = vec![
            profile("Common", vec![object("Account")]),
            profile("Other", vec![object("Contact")]),
        ];
        let err = generate(
            &profiles,
            GenerationMode::BaseSpecific,
            None,
            &BuildConfig::default(),
            GenerateOptions::default(),
        )
        .expect_err("collision");

        match err {
            GenerateError::NameCollision { filename, .. } => {
                assert_eq!(filename, "Common.permissionset-meta.xml");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_file_names_are_kept_when_allowed() {
        let mapping = NameMapping::from_json(r#"{"A":"Shared","B":"Shared"}"#).expect("mapping");
        let profiles = vec![
            profile("A", vec![object("Account")]),
            profile("B", vec![object("Contact")]),
        ];
        let artifacts = generate(
            &profiles,
            GenerationMode::Single,
            Some(&mapping),
            &BuildConfig::default(),
            GenerateOptions {
                allow_collisions: true,
            },
        )
        .expect("collisions allowed");

        assert_eq!(names(&artifacts), vec!["Shared", "Shared"]);
    }

    const USER_PROFILE: &str = "<Profile><userPermissions><enabled>true</enabled>\
        <name>ApiEnabled</name></userPermissions></Profile>";

    #[test]
    fn profile_names_with_path_characters_are_rejected() {
        let source = MemorySource::new(vec![ProfileDocument::new("team/Admin", USER_PROFILE)]);
        let batch = load_profiles(&source).expect("load");

        let err = generate(
            &batch.profiles,
            GenerationMode::Single,
            None,
            &BuildConfig::default(),
            GenerateOptions::default(),
        )
        .expect_err("name contains a path separator");
        match err {
            GenerateError::InvalidName { name, origin } => {
                assert_eq!(name, "team/Admin");
                assert_eq!(origin, "team/Admin");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn split_labels_with_path_characters_are_rejected() {
        let mut config = BuildConfig::default();
        config.labels = config
            .labels
            .with_label(PermissionCategory::UserPermission, "x/../../escaped");
        let profiles = vec![profile("Admin", vec![user("ApiEnabled")])];

        let err = generate(
            &profiles,
            GenerationMode::Split,
            None,
            &config,
            GenerateOptions::default(),
        )
        .expect_err("label escapes the output directory");
        match err {
            GenerateError::InvalidName { name, .. } => assert_eq!(name, "Admin_x/../../escaped"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn braces_in_profile_names_survive_descriptions() {
        let source = MemorySource::new(vec![ProfileDocument::new("X{label}", USER_PROFILE)]);
        let batch = load_profiles(&source).expect("load");

        let single = run(&batch.profiles, GenerationMode::Single, None);
        let root = parse_str(&single[0].content).expect("valid xml");
        assert_eq!(
            root.child_text("description"),
            Some("Permission set generated from profile X{label}")
        );

        let split = run(&batch.profiles, GenerationMode::Split, None);
        let root = parse_str(&split[0].content).expect("valid xml");
        assert_eq!(
            root.child_text("description"),
            Some("UserPermissions from profile X{label}")
        );
    }
}
