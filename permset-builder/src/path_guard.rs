use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Make sure `output` is a directory we can write into, creating it if needed.
pub fn prepare_output_dir(output: &Path) -> Result<()> {
    if output.exists() && !output.is_dir() {
        bail!(
            "refusing to use {} as output directory: it exists and is not a directory",
            output.display()
        );
    }
    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {}", output.display()))
}
