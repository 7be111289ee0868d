use anyhow::Result;

use crate::package_name::ProjectName;
use crate::utils::log::t;
use crate::{log_error, log_success};

/// Report whether `name` may be used for a new package; fails when it may not.
pub fn run(name: &str) -> Result<()> {
  match ProjectName::parse(name) {
    Ok(name) => {
      log_success!("{} is a valid package name", name);
      Ok(())
    }
    Err(err) => {
      log_error!("{} is not a valid package name", t::name(name));
      Err(err.into())
    }
  }
}
