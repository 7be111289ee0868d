use std::path::Path;

use anyhow::Result;

use crate::log_info;
use crate::package_manager::PackageManager;
use crate::utils::log::t;

pub fn run(root: &Path) -> Result<()> {
  if !root.is_dir() {
    anyhow::bail!("{} is not a directory", root.display());
  }
  let pm = PackageManager::detect(root);
  match pm.lockfile() {
    Some(lockfile) => log::debug!("found {lockfile} in {}", root.display()),
    None => log::debug!("no lockfile in {}, falling back to npm", root.display()),
  }
  log_info!("{} ({})", t::tool(pm), pm.install_command());
  Ok(())
}
