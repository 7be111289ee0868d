use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// Spawn a child process with inherited stdio and wait for it to finish.
pub fn run_child_process(program: &str, args: &[String], cwd: &Path) -> Result<ExitStatus> {
  log::debug!("running {} {} in {}", program, args.join(" "), cwd.display());
  Command::new(program)
    .current_dir(cwd)
    .args(args)
    .stdin(Stdio::inherit())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .status()
    .with_context(|| format!("failed to run {program}"))
}
