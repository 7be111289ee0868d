use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::package_manager::PackageManager;
use crate::package_name::ProjectName;

/// Project README replacing the template's own instructions.
#[must_use]
pub fn render(name: &ProjectName, pm: PackageManager) -> String {
  [
    format!("# {name}"),
    String::new(),
    "This project was generated from a template.".to_string(),
    String::new(),
    "## Setup".to_string(),
    String::new(),
    format!("This project uses `{pm}` to manage dependencies."),
    String::new(),
    "```bash".to_string(),
    pm.install_command(),
    "```".to_string(),
    String::new(),
  ]
  .join("\n")
}

/// Overwrite the README; previous content is discarded.
pub fn write(path: &Path, name: &ProjectName, pm: PackageManager) -> Result<()> {
  fs::write(path, render(name, pm)).with_context(|| format!("failed to write {}", path.display()))
}
