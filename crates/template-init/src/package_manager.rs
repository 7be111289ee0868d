use std::fmt;
use std::path::Path;

/// Package managers recognised by their lockfile, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
  Pnpm,
  Yarn,
  Bun,
  Npm,
}

impl PackageManager {
  /// Probe order; `Npm` is the fallback and has no marker.
  const PROBED: [PackageManager; 3] = [Self::Pnpm, Self::Yarn, Self::Bun];

  /// Pick the first package manager whose lockfile exists in `root`.
  #[must_use]
  pub fn detect(root: &Path) -> Self {
    Self::PROBED
      .into_iter()
      .find(|pm| pm.lockfile().is_some_and(|file| root.join(file).exists()))
      .unwrap_or(Self::Npm)
  }

  #[must_use]
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pnpm => "pnpm",
      Self::Yarn => "yarn",
      Self::Bun => "bun",
      Self::Npm => "npm",
    }
  }

  #[must_use]
  pub fn lockfile(self) -> Option<&'static str> {
    match self {
      Self::Pnpm => Some("pnpm-lock.yaml"),
      Self::Yarn => Some("yarn.lock"),
      Self::Bun => Some("bun.lockb"),
      Self::Npm => None,
    }
  }

  #[must_use]
  pub fn install_command(self) -> String {
    format!("{} install", self.as_str())
  }
}

impl fmt::Display for PackageManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
