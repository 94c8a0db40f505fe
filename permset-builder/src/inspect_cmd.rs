use std::path::Path;

use anyhow::{Context, Result};
use metadata_xml::parse_file;
use permset_builder::extract::extract_profile;
use permset_builder::permissions::NormalizedProfile;
use permset_builder::report::render_profile_stats;
use permset_builder::source::profile_name_from_path;
use permset_builder::stats::PermissionStats;
use serde::Serialize;

use crate::cli::{InspectArgs, OutputFormat};

#[derive(Serialize)]
struct InspectReport<'a> {
    profile: &'a str,
    stats: PermissionStats,
}

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let profile = read_profile(&args.file)?;
    let stats = PermissionStats::of(&profile.permissions);

    match args.format {
        OutputFormat::Text => println!("{}", render_profile_stats(&profile.name, &stats)),
        OutputFormat::Json => {
            let report = InspectReport {
                profile: &profile.name,
                stats,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Parse and extract a single profile file. Unlike batch loading, a
/// malformed file is an error here.
pub fn read_profile(path: &Path) -> Result<NormalizedProfile> {
    let root = parse_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
    let name = profile_name_from_path(path)
        .or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| path.display().to_string());
    Ok(extract_profile(name, &root))
}
