use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assert_cmd::Command;
use tempfile::TempDir;

use super::tempdir_in_sandbox;

/// Name of the project directory; valid as a package name so it can be
/// accepted as the prompt default.
pub const PROJECT_DIR: &str = "my-template";

pub const TEMPLATE_MANIFEST: &str = r#"{
  "name": "template",
  "version": "0.1.0",
  "private": true,
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "postinstall": "./.init-script/template-init"
  },
  "devDependencies": {
    "vite": "^5.0.0"
  }
}
"#;

pub const TEMPLATE_README: &str = "# Vite Template\n\nClick \"Use this template\" to get started.\n";

const RECORDING_GIT: &str = "#!/bin/sh\nprintf '%s\\n' \"$*\" >> \"$FAKE_GIT_LOG\"\n";

/// A freshly "installed" template:
///
/// ```text
/// <temp>/my-template/package.json
/// <temp>/my-template/README.md
/// <temp>/my-template/.init-script/
/// <temp>/bin/git        (records its arguments)
/// <temp>/xdg/           (XDG_CONFIG_HOME)
/// ```
#[derive(Debug)]
pub struct TestEnv {
  temp: TempDir,
  root: PathBuf,
}

impl TestEnv {
  pub fn run<F, R>(f: F) -> R
  where
    F: FnOnce(&TestEnv) -> R,
  {
    let env = TestEnv::new();
    f(&env)
  }

  pub fn new() -> Self {
    let temp = tempdir_in_sandbox();
    let root = temp.path().join(PROJECT_DIR);
    let env = Self { temp, root };
    if let Err(err) = env.scaffold() {
      panic!("scaffold test template failed: {err:#}");
    }
    env
  }

  fn scaffold(&self) -> Result<()> {
    std::fs::create_dir_all(self.script_dir()).context("create script dir")?;
    std::fs::create_dir_all(self.xdg_home_dir()).context("create xdg home")?;
    self.write_file("package.json", TEMPLATE_MANIFEST)?;
    self.write_file("README.md", TEMPLATE_README)?;
    self.write_file(".init-script/template-init", "placeholder binary")?;
    self.install_fake_git(RECORDING_GIT)?;
    Ok(())
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn script_dir(&self) -> PathBuf {
    self.root.join(".init-script")
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  pub fn xdg_home_dir(&self) -> PathBuf {
    self.temp.path().join("xdg")
  }

  pub fn git_log_path(&self) -> PathBuf {
    self.temp.path().join("git.log")
  }

  /// `PATH` with the fake tool directory in front.
  pub fn path_var(&self) -> String {
    match std::env::var("PATH") {
      Ok(existing) if !existing.is_empty() => format!("{}:{existing}", self.bin_dir().display()),
      _ => self.bin_dir().display().to_string(),
    }
  }

  /// Command running `template-init` from the project root with the test
  /// environment but no path arguments.
  pub fn cmd(&self) -> Result<Command> {
    let mut cmd = Command::cargo_bin("template-init")?;
    cmd.current_dir(self.root());
    cmd.env("PATH", self.path_var());
    cmd.env("XDG_CONFIG_HOME", self.xdg_home_dir());
    cmd.env("FAKE_GIT_LOG", self.git_log_path());
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
  }

  /// Copy of the built binary placed in `<temp>/tools/` next to an unrelated
  /// file, so the executable's own directory is not the template's script dir.
  pub fn copied_binary_cmd(&self) -> Result<Command> {
    let tools = self.tools_dir();
    std::fs::create_dir_all(&tools).context("create tools dir")?;
    std::fs::write(tools.join("unrelated-tool"), "keep me").context("write unrelated tool")?;
    let binary = tools.join("template-init");
    std::fs::copy(assert_cmd::cargo::cargo_bin("template-init"), &binary)
      .context("copy template-init binary")?;
    let mut cmd = Command::new(binary);
    cmd.current_dir(self.root());
    cmd.env("PATH", self.path_var());
    cmd.env("XDG_CONFIG_HOME", self.xdg_home_dir());
    cmd.env("FAKE_GIT_LOG", self.git_log_path());
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
  }

  pub fn tools_dir(&self) -> PathBuf {
    self.temp.path().join("tools")
  }

  /// Command running the init workflow against this template.
  pub fn init_cmd(&self) -> Result<Command> {
    let mut cmd = self.cmd()?;
    cmd.arg("--script-dir").arg(self.script_dir());
    Ok(cmd)
  }

  pub fn write_file(&self, relative: &str, body: &str) -> Result<PathBuf> {
    let path = self.root.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir for {}", path.display()))?;
    }
    std::fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
  }

  pub fn write_executable_script(&self, path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir for {}", path.display()))?;
    }
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt as _;
      let mut perms = std::fs::metadata(path)?.permissions();
      perms.set_mode(0o755);
      std::fs::set_permissions(path, perms)
        .with_context(|| format!("set executable bit on {}", path.display()))?;
    }
    Ok(())
  }

  /// Replace the fake `git` on PATH.
  pub fn install_fake_git(&self, body: &str) -> Result<()> {
    self.write_executable_script(&self.bin_dir().join("git"), body)
  }

  /// Arguments of every fake git invocation, one line each.
  pub fn git_calls(&self) -> Vec<String> {
    std::fs::read_to_string(self.git_log_path())
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  pub fn read(&self, relative: &str) -> Result<String> {
    let path = self.root.join(relative);
    std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
  }

  pub fn manifest(&self) -> Result<serde_json::Value> {
    let body = self.read("package.json")?;
    serde_json::from_str(&body).context("parse package.json")
  }
}
