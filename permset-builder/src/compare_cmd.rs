use anyhow::Result;
use permset_builder::compare::compare;
use permset_builder::report::render_comparison;

use crate::cli::{CompareArgs, OutputFormat};
use crate::inspect_cmd::read_profile;

pub fn run_compare(args: CompareArgs) -> Result<()> {
    let left = read_profile(&args.left)?;
    let right = read_profile(&args.right)?;
    let comparison = compare(&left, &right, args.category);

    match args.format {
        OutputFormat::Text => println!("{}", render_comparison(&comparison)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }
    Ok(())
}
