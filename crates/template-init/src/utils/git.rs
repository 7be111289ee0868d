use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::utils::child::run_child_process;

/// Run a `git` command in `cwd` with inherited stdio. Fails if git exits with
/// a non-zero status.
pub fn git(args: &[&str], cwd: &Path) -> Result<()> {
  let arg_vec: Vec<String> = args.iter().map(|s| (*s).to_string()).collect();
  let status = run_child_process("git", &arg_vec, cwd)?;
  if !status.success() {
    bail!("git {} exited with status {}", args.join(" "), status);
  }
  Ok(())
}

/// Create a repository in `root` holding every file as a single commit.
/// Stops at the first failing subcommand.
pub fn init_repository(root: &Path, commit_message: &str) -> Result<()> {
  git(&["init"], root)?;
  git(&["add", "."], root)?;
  git(&["commit", "-m", commit_message], root)
}

/// Whether a `git` executable can be found on `PATH`.
#[must_use]
pub fn git_on_path() -> bool {
  find_executable("git", std::env::var_os("PATH").as_deref()).is_some()
}

fn find_executable(program: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
  std::env::split_paths(path_var?)
    .flat_map(|dir| candidates(&dir, program))
    .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
  vec![dir.join(program)]
}

#[cfg(not(unix))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
  vec![dir.join(program), dir.join(format!("{program}.exe"))]
}

fn is_executable(path: &Path) -> bool {
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::metadata(path)
      .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
      .unwrap_or(false)
  }
  #[cfg(not(unix))]
  {
    path.is_file()
  }
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;
  use std::ffi::OsString;
  use std::os::unix::fs::PermissionsExt as _;

  fn write_tool(dir: &Path, name: &str, mode: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    path
  }

  #[test]
  fn finds_first_executable_on_path() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_tool(first.path(), "git", 0o644);
    let expected = write_tool(second.path(), "git", 0o755);
    let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();
    assert_eq!(find_executable("git", Some(path_var.as_os_str())), Some(expected));
  }

  #[test]
  fn missing_or_unset_path_finds_nothing() {
    let empty = tempfile::tempdir().unwrap();
    let path_var = OsString::from(empty.path());
    assert_eq!(find_executable("git", Some(path_var.as_os_str())), None);
    assert_eq!(find_executable("git", None), None);
  }

  #[test]
  fn non_zero_exit_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    // `git frobnicate` is not a git command and exits non-zero
    if git_on_path() {
      let err = git(&["frobnicate"], dir.path()).unwrap_err();
      assert!(err.to_string().starts_with("git frobnicate exited with status"));
    }
  }
}
