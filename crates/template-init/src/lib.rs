use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod error;
mod manifest;
mod package_manager;
mod package_name;
mod readme;
mod utils;

use crate::commands::init::InitArgs;
use crate::config::{AppContext, InitPaths, load_config};

pub use crate::error::InitError;

/// template-init - Turn a freshly installed template into your own project.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
  /// Directory holding the initializer; removed once init finishes.
  /// Defaults to the directory of this executable.
  #[arg(long, global = true, value_name = "DIR")]
  script_dir: Option<PathBuf>,
  /// Project root. Defaults to the parent of the script directory.
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,
  #[command(flatten)]
  init: InitArgs,
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
  /// Print the package manager detected from the lockfiles in the project root
  Detect,
  /// Check a name against the npm package naming rules
  CheckName { name: String },
}

pub fn parse() -> Cli {
  Cli::parse()
}

pub fn run() -> Result<()> {
  let cli = parse();
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

  match cli.command {
    Some(Commands::Detect) => {
      let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
      };
      commands::detect::run(&root)?;
    }
    Some(Commands::CheckName { name }) => {
      commands::check_name::run(&name)?;
    }
    None => {
      let paths = InitPaths::resolve(cli.script_dir, cli.root)?;
      let config = load_config(paths.script_dir())?;
      let ctx = AppContext { paths, config };
      commands::init::run(&ctx, &cli.init)?;
    }
  }

  Ok(())
}
