use std::fs;
use std::path::PathBuf;

use permset_builder::category::PermissionCategory;
use permset_builder::config::BuildConfig;
use permset_builder::generate::{generate, ArtifactKind, GenerateOptions};
use permset_builder::mode::GenerationMode;
use permset_builder::reconcile::{complement, intersect, partition, unify};
use permset_builder::source::{load_profiles, MemorySource, ProfileDocument};
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn fixture_source() -> MemorySource {
    let read = |name: &str| {
        fs::read(fixture(&format!("fixtures/profiles/{name}.profile-meta.xml")))
            .expect("read fixture")
    };
    MemorySource::new(vec![
        ProfileDocument::new("Admin", read("Admin")),
        ProfileDocument::new("Standard", read("Standard")),
    ])
}

#[test]
fn memory_and_fixture_profiles_satisfy_partition_law() {
    let batch = load_profiles(&fixture_source()).expect("load");
    assert!(batch.failures.is_empty());

    let (common, specifics) = partition(&batch.profiles);
    assert_eq!(common, intersect(&batch.profiles));
    assert_eq!(common.total(), 5);

    for (profile, specific) in batch.profiles.iter().zip(&specifics) {
        assert_eq!(*specific, complement(&profile.permissions, &common));
        for category in PermissionCategory::ALL {
            let mut rebuilt: Vec<_> = common
                .get(category)
                .iter()
                .chain(specific.get(category))
                .map(|entry| entry.identity_key().to_string())
                .collect();
            let mut original: Vec<_> = profile
                .permissions
                .get(category)
                .iter()
                .map(|entry| entry.identity_key().to_string())
                .collect();
            rebuilt.sort();
            original.sort();
            assert_eq!(rebuilt, original, "{} {category}", profile.name);
        }
    }
}

#[test]
fn unify_is_idempotent_on_fixtures() {
    let batch = load_profiles(&fixture_source()).expect("load");
    let once = unify(&batch.profiles);
    let again = unify(&[permset_builder::permissions::NormalizedProfile::new(
        "Unified",
        once.clone(),
    )]);
    assert_eq!(once, again);
    assert_eq!(once.total(), 11);
}

#[test]
fn base_specific_artifacts_from_memory_source() {
    let batch = load_profiles(&fixture_source()).expect("load");
    let artifacts = generate(
        &batch.profiles,
        GenerationMode::BaseSpecific,
        None,
        &BuildConfig::default(),
        GenerateOptions::default(),
    )
    .expect("generate");

    let summary: Vec<_> = artifacts
        .iter()
        .map(|a| (a.name.as_str(), a.kind, a.stats.total))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Common", ArtifactKind::Common, 5),
            ("Admin", ArtifactKind::Specific, 6),
            ("Standard", ArtifactKind::Specific, 1),
        ]
    );
}
