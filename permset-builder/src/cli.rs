use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use permset_builder::category::PermissionCategory;
use permset_builder::mode::GenerationMode;

#[derive(Parser, Debug)]
#[command(name = "permset-builder")]
#[command(about = "Convert Salesforce profiles into permission sets")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Generate permission sets from a directory of profiles.
    Generate(GenerateArgs),
    /// Show per-category permission counts for one profile.
    Inspect(InspectArgs),
    /// Compare the permissions of two profiles.
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Directory containing `*.profile-meta.xml` files.
    #[arg(short, long)]
    pub input: PathBuf,
    /// Directory to write `*.permissionset-meta.xml` files into.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Generation mode: single, split, unified or base+specific.
    #[arg(long, default_value = "single", value_parser = parse_mode)]
    pub mode: GenerationMode,
    /// JSON file mapping profile names to permission set names.
    #[arg(long)]
    pub name_mapping: Option<PathBuf>,
    /// TOML file overriding category labels and description templates.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Report what would be written without touching the output directory.
    #[arg(long)]
    pub dry_run: bool,
    /// Allow several permission sets to share a file name; the last one wins.
    #[arg(long)]
    pub allow_overwrite: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Profile file to inspect.
    pub file: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Only compare one category (for example `objectPermissions`).
    #[arg(long, value_parser = parse_category)]
    pub category: Option<PermissionCategory>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_mode(raw: &str) -> Result<GenerationMode, String> {
    raw.parse().map_err(|err: permset_builder::generate::InputError| err.to_string())
}

fn parse_category(raw: &str) -> Result<PermissionCategory, String> {
    raw.parse()
        .map_err(|err: permset_builder::category::UnknownCategory| err.to_string())
}
