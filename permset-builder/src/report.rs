use colored::Colorize;

use crate::category::PermissionCategory;
use crate::compare::{CategoryComparison, ProfileComparison};
use crate::generate::OutputArtifact;
use crate::source::LoadFailure;
use crate::stats::{PermissionStats, RunSummary};

/// Render one line per artifact. Dry runs say what would be written.
pub fn render_artifacts(artifacts: &[OutputArtifact], dry_run: bool) -> String {
    let verb = if dry_run { "would write" } else { "wrote" };
    let mut out = Vec::new();
    for artifact in artifacts {
        out.push(format!(
            "{} {} permissions={} sources={}",
            verb.green(),
            artifact.filename,
            artifact.stats.total,
            artifact.sources.join(",")
        ));
    }
    out.join("\n")
}

/// Render totals for a generation run.
pub fn render_run_summary(summary: &RunSummary) -> String {
    let mut out = vec![format!(
        "generate_summary profiles={} artifacts={} source_permissions={} output_permissions={}",
        summary.profiles_processed,
        summary.artifacts_generated,
        summary.source_permissions,
        summary.output_permissions
    )
    .cyan()
    .to_string()];
    for (category, count) in &summary.source_by_category {
        if *count > 0 {
            out.push(format!("- {category}: {count}"));
        }
    }
    out.join("\n")
}

/// Render profiles that failed to parse and were converted as empty.
pub fn render_failures(failures: &[LoadFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} profile={} error={}", "SKIPPED".yellow(), f.name, f.error))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render per-category entry counts for one profile.
pub fn render_profile_stats(name: &str, stats: &PermissionStats) -> String {
    let mut out = vec![format!("profile={} total={}", name.bold(), stats.total)];
    for category in PermissionCategory::ALL {
        out.push(format!("- {category}: {}", stats.count(category)));
    }
    out.join("\n")
}

/// Render a profile comparison. Categories with nothing in them are left out.
pub fn render_comparison(comparison: &ProfileComparison) -> String {
    let mut out = vec![format!(
        "compare left={} right={}",
        comparison.left, comparison.right
    )];

    for category in &comparison.categories {
        if category.shared.is_empty() && !category.has_differences() {
            continue;
        }
        out.push(render_category(category));
    }

    if comparison.is_identical() {
        out.push("no differences".cyan().to_string());
    }
    out.join("\n")
}

fn render_category(category: &CategoryComparison) -> String {
    let mut out = vec![format!(
        "{} shared={} changed={} only_left={} only_right={}",
        category.category.to_string().bold(),
        category.shared.len(),
        category.changed.len(),
        category.only_left.len(),
        category.only_right.len()
    )];

    for changed in &category.changed {
        let fields: Vec<String> = changed
            .differences
            .iter()
            .map(|d| {
                format!(
                    "{}: {} -> {}",
                    d.field,
                    d.left.as_deref().unwrap_or("-"),
                    d.right.as_deref().unwrap_or("-")
                )
            })
            .collect();
        out.push(format!("~ {} ({})", changed.identity, fields.join(", ")).yellow().to_string());
    }
    for identity in &category.only_left {
        out.push(format!("- {identity}").red().to_string());
    }
    for identity in &category.only_right {
        out.push(format!("+ {identity}").green().to_string());
    }
    out.join("\n")
}
