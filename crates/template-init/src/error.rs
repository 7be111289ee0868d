use std::path::PathBuf;

use thiserror::Error;

/// Failures of the init workflow that callers may want to tell apart.
#[derive(Debug, Error)]
pub enum InitError {
  #[error("init cancelled, no files were changed")]
  Cancelled,
  #[error(
    "refusing to remove script directory {}: it is not inside the project root {}",
    .script_dir.display(),
    .root.display()
  )]
  UnsafeScriptDir { script_dir: PathBuf, root: PathBuf },
  #[error("invalid project name `{name}`:\n{messages}")]
  InvalidName { name: String, messages: String },
  #[error("{} must contain a JSON object", .path.display())]
  ManifestNotObject { path: PathBuf },
}
