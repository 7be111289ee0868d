use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{AppContext, GitInitMode};
use crate::manifest::{self, modify_manifest, read_manifest};
use crate::package_manager::PackageManager;
use crate::package_name::{ProjectName, validate};
use crate::readme;
use crate::utils::git::{git_on_path, init_repository};
use crate::utils::log::t;
use crate::utils::wizard::Wizard;
use crate::{log_info, log_step, log_success, log_warn};

const NAME_PROMPT: &str = "What would you like to name your project?";
const GIT_PROMPT: &str = "Would you like to initialize a Git repository?";

#[derive(Debug, Clone, Default, Args)]
pub struct InitArgs {
  /// Project name to use instead of prompting
  #[arg(long, value_name = "NAME")]
  pub name: Option<String>,
  /// Initialize a Git repository without asking
  #[arg(long, conflicts_with = "no_git")]
  pub git: bool,
  /// Skip Git repository initialization
  #[arg(long)]
  pub no_git: bool,
  /// package.json script that launches the initializer (default: postinstall)
  #[arg(long, value_name = "HOOK")]
  pub hook: Option<String>,
}

impl InitArgs {
  fn git_mode(&self) -> Option<GitInitMode> {
    if self.git {
      Some(GitInitMode::Always)
    } else if self.no_git {
      Some(GitInitMode::Never)
    } else {
      None
    }
  }
}

/// Turn the installed template into the user's project, then remove the
/// initializer so it cannot run again.
pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
  let paths = &ctx.paths;
  let manifest_path = paths.manifest_path();
  let hook = args.hook.as_deref().unwrap_or(&ctx.config.hook);

  // Everything that can be checked up front is checked before the first write.
  paths.ensure_script_dir_removable()?;
  read_manifest(&manifest_path)?;

  let pm = PackageManager::detect(paths.root());
  log_info!("");
  log_step!("Installed dependencies with {}", t::tool(pm));
  log_step!("Running template init script...");
  log_info!("");

  let wizard = Wizard::new();
  let name = prompt_name(&wizard, &paths.root_name(), args.name.as_deref())?;
  let git_init = decide_git_init(&wizard, ctx, args.git_mode())?;

  modify_manifest(&manifest_path, |m| manifest::set_name(m, name.as_str()))?;
  readme::write(&paths.readme_path(), &name, pm)?;

  log_info!("");
  log_step!("Cleaning up package.json scripts...");
  let mut removed = false;
  modify_manifest(&manifest_path, |m| removed = manifest::remove_script(m, hook))?;
  if !removed {
    log::debug!("package.json has no `{hook}` script");
  }

  log_step!("Cleaning up init script...");
  remove_script_dir(paths.script_dir())?;

  if git_init {
    log_step!("Initializing Git repository...");
    init_repository(paths.root(), &ctx.config.git.commit_message)?;
  }

  log_info!("");
  log_success!("✔ Template init script finished successfully");
  log_info!(
    "Project {} is ready in {}",
    t::name(&name),
    t::path(paths.root().display())
  );
  Ok(())
}

fn prompt_name(wizard: &Wizard, default: &str, preset: Option<&str>) -> Result<ProjectName> {
  if let Some(name) = preset {
    return Ok(ProjectName::parse(name)?);
  }
  let answer = wizard.validated_text(NAME_PROMPT, default, |input| {
    let validation = validate(input);
    if validation.valid_for_new_packages() {
      Ok(())
    } else {
      Err(validation.message())
    }
  })?;
  Ok(ProjectName::parse(&answer)?)
}

fn decide_git_init(
  wizard: &Wizard,
  ctx: &AppContext,
  requested: Option<GitInitMode>,
) -> Result<bool> {
  if ctx.paths.git_dir().exists() {
    log::debug!("{} exists, leaving Git alone", ctx.paths.git_dir().display());
    return Ok(false);
  }
  match requested.unwrap_or(ctx.config.git.init) {
    GitInitMode::Never => Ok(false),
    GitInitMode::Always => Ok(true),
    GitInitMode::Ask => {
      if !git_on_path() {
        log_warn!("git not found on PATH, skipping repository setup");
        return Ok(false);
      }
      wizard.confirm(GIT_PROMPT, true)
    }
  }
}

/// Final mutation: the initializer's own directory.
fn remove_script_dir(dir: &Path) -> Result<()> {
  match fs::remove_dir_all(dir) {
    Ok(()) => Ok(()),
    Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(err) => Err(err).with_context(|| format!("failed to remove {}", dir.display())),
  }
}
