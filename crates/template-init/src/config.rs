use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use owo_colors::OwoColorize as _;
use serde::Deserialize;
use toml::Value as TomlValue;

use crate::error::InitError;

/// File name of the config layers (global and next to the initializer).
pub const CONFIG_FILE_NAME: &str = "init.toml";

/// Known top-level config keys.
const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["hook", "git"];

/// Known keys within the `[git]` section.
const KNOWN_GIT_KEYS: &[&str] = &["init", "commit_message"];

// Embed repository defaults
const DEFAULT_TOML: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/defaults/init.toml"));

/// How the Git repository question is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitInitMode {
  #[default]
  Ask,
  Always,
  Never,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitConfig {
  pub init: GitInitMode,
  pub commit_message: String,
}

impl Default for GitConfig {
  fn default() -> Self {
    Self {
      init: GitInitMode::Ask,
      commit_message: "Initial commit".to_string(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InitConfig {
  /// `scripts` entry in package.json that launches the initializer.
  pub hook: String,
  pub git: GitConfig,
}

impl Default for InitConfig {
  fn default() -> Self {
    Self {
      hook: "postinstall".to_string(),
      git: GitConfig::default(),
    }
  }
}

/// Locations the workflow reads, rewrites and removes.
#[derive(Debug, Clone)]
pub struct InitPaths {
  root: PathBuf,
  script_dir: PathBuf,
}

impl InitPaths {
  pub fn new(root: impl Into<PathBuf>, script_dir: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      script_dir: script_dir.into(),
    }
  }

  /// Resolve the script directory (flag, else the executable's directory) and
  /// the project root (flag, else the script directory's parent).
  ///
  /// # Errors
  /// Returns an error if a directory does not exist or cannot be resolved.
  pub fn resolve(script_dir: Option<PathBuf>, root: Option<PathBuf>) -> Result<Self> {
    let script_dir = match script_dir {
      Some(dir) => canonical_dir(&dir)?,
      None => executable_dir()?,
    };
    let root = match root {
      Some(dir) => canonical_dir(&dir)?,
      None => script_dir
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("script directory {} has no parent", script_dir.display()))?,
    };
    Ok(Self::new(root, script_dir))
  }

  #[must_use]
  pub fn root(&self) -> &PathBuf {
    &self.root
  }

  #[must_use]
  pub fn script_dir(&self) -> &PathBuf {
    &self.script_dir
  }

  #[must_use]
  pub fn manifest_path(&self) -> PathBuf {
    self.root.join("package.json")
  }

  #[must_use]
  pub fn readme_path(&self) -> PathBuf {
    self.root.join("README.md")
  }

  #[must_use]
  pub fn git_dir(&self) -> PathBuf {
    self.root.join(".git")
  }

  /// Base name of the project root, used as the default project name.
  #[must_use]
  pub fn root_name(&self) -> String {
    self
      .root
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  /// The script directory is removed recursively, so it must sit strictly
  /// inside the project root.
  ///
  /// # Errors
  /// Returns [`InitError::UnsafeScriptDir`] when the script directory is the
  /// root itself or lies outside of it.
  pub fn ensure_script_dir_removable(&self) -> Result<(), InitError> {
    if self.script_dir == self.root || !self.script_dir.starts_with(&self.root) {
      return Err(InitError::UnsafeScriptDir {
        script_dir: self.script_dir.clone(),
        root: self.root.clone(),
      });
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct AppContext {
  pub paths: InitPaths,
  pub config: InitConfig,
}

fn canonical_dir(dir: &Path) -> Result<PathBuf> {
  let resolved =
    fs::canonicalize(dir).with_context(|| format!("failed to resolve {}", dir.display()))?;
  if !resolved.is_dir() {
    anyhow::bail!("{} is not a directory", resolved.display());
  }
  Ok(resolved)
}

fn executable_dir() -> Result<PathBuf> {
  let exe = std::env::current_exe().context("failed to locate the running executable")?;
  let exe = fs::canonicalize(&exe).unwrap_or(exe);
  exe
    .parent()
    .map(Path::to_path_buf)
    .ok_or_else(|| anyhow!("executable {} has no parent directory", exe.display()))
}

fn merge_values(base: &mut TomlValue, overlay: TomlValue) {
  match (base, overlay) {
    (TomlValue::Table(base_tbl), TomlValue::Table(overlay_tbl)) => {
      for (k, v) in overlay_tbl {
        match base_tbl.get_mut(&k) {
          Some(existing) => merge_values(existing, v),
          None => {
            base_tbl.insert(k, v);
          }
        }
      }
    }
    // Arrays and scalars: replace last-wins
    (base_slot, new_v) => *base_slot = new_v,
  }
}

/// Collect unknown keys in a parsed TOML config file as dotted paths.
fn unknown_keys(val: &TomlValue) -> Vec<String> {
  let TomlValue::Table(table) = val else {
    return Vec::new();
  };

  let mut unknown: Vec<String> = table
    .keys()
    .filter(|key| !KNOWN_TOP_LEVEL_KEYS.contains(&key.as_str()))
    .cloned()
    .collect();

  if let Some(TomlValue::Table(git)) = table.get("git") {
    unknown.extend(
      git
        .keys()
        .filter(|key| !KNOWN_GIT_KEYS.contains(&key.as_str()))
        .map(|key| format!("git.{key}")),
    );
  }
  unknown
}

fn read_layer(path: &Path) -> Result<TomlValue> {
  let data =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let val: TomlValue =
    toml::from_str(&data).with_context(|| format!("invalid TOML in {}", path.display()))?;
  for key in unknown_keys(&val) {
    anstream::eprintln!(
      "{}: unknown config key '{}' in {} (known keys: {}, {})",
      "warning".yellow(),
      key,
      path.display(),
      KNOWN_TOP_LEVEL_KEYS.join(", "),
      KNOWN_GIT_KEYS
        .iter()
        .map(|k| format!("git.{k}"))
        .collect::<Vec<_>>()
        .join(", ")
    );
  }
  Ok(val)
}

fn parse_layers(layers: Vec<TomlValue>) -> Result<InitConfig> {
  let mut merged: TomlValue =
    toml::from_str(DEFAULT_TOML).context("invalid embedded default config")?;
  for layer in layers {
    merge_values(&mut merged, layer);
  }
  merged
    .try_into::<InitConfig>()
    .context("failed to parse merged config")
}

/// Load and merge configuration from defaults, the global XDG file and the
/// `init.toml` next to the initializer.
///
/// # Errors
/// Returns an error if a config file cannot be read or is not valid TOML
/// for the expected schema.
pub fn load_config(script_dir: &Path) -> Result<InitConfig> {
  let mut layers = Vec::new();

  let xdg = xdg::BaseDirectories::with_prefix("template-init");
  if let Some(global_path) = xdg.find_config_file(CONFIG_FILE_NAME) {
    log::debug!("loading global config {}", global_path.display());
    layers.push(read_layer(&global_path)?);
  }

  let local_path = script_dir.join(CONFIG_FILE_NAME);
  if local_path.is_file() {
    log::debug!("loading config {}", local_path.display());
    layers.push(read_layer(&local_path)?);
  }

  parse_layers(layers)
}
