use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::error::InitError;

pub type Manifest = Map<String, Value>;

/// Read `package.json` as a JSON object.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON, or its
/// top-level value is not an object.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
  let data =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let value: Value =
    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))?;
  match value {
    Value::Object(map) => Ok(map),
    _ => Err(
      InitError::ManifestNotObject {
        path: path.to_path_buf(),
      }
      .into(),
    ),
  }
}

/// Read-modify-write `package.json`: apply `update` to the parsed object and
/// write it back with 2-space indentation and a trailing newline. Key order
/// is preserved.
///
/// # Errors
/// Returns an error if reading, parsing or writing the file fails.
pub fn modify_manifest<F>(path: &Path, update: F) -> Result<()>
where
  F: FnOnce(&mut Manifest),
{
  let mut manifest = read_manifest(path)?;
  update(&mut manifest);
  let mut out = serde_json::to_string_pretty(&manifest)
    .with_context(|| format!("failed to serialize {}", path.display()))?;
  out.push('\n');
  fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

pub fn set_name(manifest: &mut Manifest, name: &str) {
  manifest.insert("name".to_string(), Value::String(name.to_string()));
}

/// Remove `scripts.<hook>`. Returns whether an entry was removed.
pub fn remove_script(manifest: &mut Manifest, hook: &str) -> bool {
  match manifest.get_mut("scripts") {
    Some(Value::Object(scripts)) => scripts.shift_remove(hook).is_some(),
    _ => false,
  }
}
