//! npm package naming rules.
//!
//! Mirrors the checks npm applies to new packages: hard errors for names npm
//! refuses outright, warnings for legacy names that are no longer accepted
//! for new packages. A name is usable only when both lists are empty.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::InitError;

const MAX_LENGTH: usize = 214;

const BLOCKLIST: &[&str] = &["node_modules", "favicon.ico"];

const CORE_MODULES: &[&str] = &[
  "assert",
  "async_hooks",
  "buffer",
  "child_process",
  "cluster",
  "console",
  "constants",
  "crypto",
  "dgram",
  "diagnostics_channel",
  "dns",
  "domain",
  "events",
  "fs",
  "http",
  "http2",
  "https",
  "inspector",
  "module",
  "net",
  "os",
  "path",
  "perf_hooks",
  "process",
  "punycode",
  "querystring",
  "readline",
  "repl",
  "stream",
  "string_decoder",
  "sys",
  "timers",
  "tls",
  "trace_events",
  "tty",
  "url",
  "util",
  "v8",
  "vm",
  "wasi",
  "worker_threads",
  "zlib",
];

static SCOPED_RE: OnceLock<Regex> = OnceLock::new();

/// Outcome of checking a candidate package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameValidation {
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
}

impl NameValidation {
  #[must_use]
  pub fn valid_for_new_packages(&self) -> bool {
    self.errors.is_empty() && self.warnings.is_empty()
  }

  /// Errors first, then warnings, one per line.
  #[must_use]
  pub fn message(&self) -> String {
    self
      .errors
      .iter()
      .chain(self.warnings.iter())
      .map(String::as_str)
      .collect::<Vec<_>>()
      .join("\n")
  }
}

/// A project name that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
  /// # Errors
  /// Returns [`InitError::InvalidName`] with every validator message when the
  /// name is not valid for new packages.
  pub fn parse(name: &str) -> Result<Self, InitError> {
    let validation = validate(name);
    if validation.valid_for_new_packages() {
      Ok(Self(name.to_string()))
    } else {
      Err(InitError::InvalidName {
        name: name.to_string(),
        messages: validation.message(),
      })
    }
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ProjectName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Characters `encodeURIComponent` leaves untouched.
fn is_uri_component_safe(s: &str) -> bool {
  s.chars().all(|c| {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
  })
}

#[must_use]
pub fn validate(name: &str) -> NameValidation {
  let mut errors = Vec::new();
  let mut warnings = Vec::new();

  if name.is_empty() {
    errors.push("name length must be greater than zero".to_string());
  }
  if name.starts_with('.') {
    errors.push("name cannot start with a period".to_string());
  }
  if name.starts_with('_') {
    errors.push("name cannot start with an underscore".to_string());
  }
  if name.trim() != name {
    errors.push("name cannot contain leading or trailing spaces".to_string());
  }
  if let Some(blocked) = BLOCKLIST.iter().find(|b| name.eq_ignore_ascii_case(b)) {
    errors.push(format!("{blocked} is not a valid package name"));
  }

  if CORE_MODULES.contains(&name.to_lowercase().as_str()) {
    warnings.push(format!("{name} is a core module name"));
  }
  if name.chars().count() > MAX_LENGTH {
    warnings.push(format!(
      "name can no longer contain more than {MAX_LENGTH} characters"
    ));
  }
  if name.to_lowercase() != name {
    warnings.push("name can no longer contain capital letters".to_string());
  }
  let last_segment = name.rsplit('/').next().unwrap_or_default();
  if last_segment.contains(['~', '\'', '!', '(', ')', '*']) {
    warnings.push(r#"name can no longer contain special characters ("~'!()*")"#.to_string());
  }

  if !is_uri_component_safe(name) {
    let scoped_re = SCOPED_RE
      .get_or_init(|| Regex::new(r"^(?:@([^/]+?)/)?([^/]+?)$").expect("valid regex"));
    let mut scoped_ok = false;
    if let Some(caps) = scoped_re.captures(name) {
      let pkg = caps.get(2).map_or("", |m| m.as_str());
      if pkg.starts_with('.') {
        errors.push("name cannot start with a period".to_string());
      }
      if let Some(scope) = caps.get(1) {
        scoped_ok = is_uri_component_safe(scope.as_str()) && is_uri_component_safe(pkg);
      }
    }
    if !scoped_ok {
      errors.push("name can only contain URL-friendly characters".to_string());
    }
  }

  NameValidation { errors, warnings }
}
