use std::io::{self, IsTerminal as _, Read, Write};

use anyhow::{Context, Result, anyhow};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Text};
use owo_colors::OwoColorize as _;

use crate::error::InitError;
use crate::{log_info, log_warn};

const MAX_LINE_LEN: usize = 1024;

/// Interactive prompts: `inquire` on a TTY, a line-based fallback otherwise
/// (tests, piped input, package managers that swallow the terminal).
#[derive(Clone, Debug)]
pub struct Wizard {
  is_tty: bool,
}

impl Wizard {
  #[must_use]
  pub fn new() -> Self {
    let stdin_tty = io::stdin().is_terminal();
    let stdout_tty = io::stdout().is_terminal();
    Self {
      is_tty: stdin_tty && stdout_tty,
    }
  }

  /// Prompt for text until `validate` accepts it. An empty answer selects
  /// `default`. Validator messages are shown and the prompt repeats.
  ///
  /// # Errors
  /// Returns [`InitError::Cancelled`] when the user aborts or input ends.
  pub fn validated_text<V>(&self, prompt: &str, default: &str, validate: V) -> Result<String>
  where
    V: Fn(&str) -> Result<(), String> + Clone + 'static,
  {
    if self.is_tty {
      return Text::new(prompt)
        .with_default(default)
        .with_validator(move |input: &str| {
          Ok::<_, CustomUserError>(match validate(input) {
            Ok(()) => Validation::Valid,
            Err(msg) => Validation::Invalid(msg.into()),
          })
        })
        .prompt()
        .map_err(map_inquire_err);
    }
    Self::fallback_validated_text(prompt, default, &validate)
  }

  /// Prompt for a yes/no confirmation.
  ///
  /// # Errors
  /// Returns [`InitError::Cancelled`] when the user aborts the prompt.
  pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
    if self.is_tty {
      return Confirm::new(prompt)
        .with_default(default)
        .prompt()
        .map_err(map_inquire_err);
    }
    Self::fallback_confirm(prompt, default)
  }

  fn fallback_validated_text<V>(prompt: &str, default: &str, validate: &V) -> Result<String>
  where
    V: Fn(&str) -> Result<(), String>,
  {
    loop {
      log_info!("{} [{}]", prompt, default);
      print_cursor();

      let input = match read_line()? {
        Line::Text(input) => input,
        Line::TooLong => {
          log_warn!("input is longer than {} bytes", MAX_LINE_LEN);
          continue;
        }
        Line::Eof => return Err(InitError::Cancelled.into()),
      };
      let answer = if input.is_empty() {
        default.to_string()
      } else {
        input
      };
      match validate(&answer) {
        Ok(()) => return Ok(answer),
        Err(msg) => {
          for line in msg.lines() {
            log_warn!("{}", line);
          }
        }
      }
    }
  }

  fn fallback_confirm(prompt: &str, default: bool) -> Result<bool> {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    log_info!("{} {}", prompt, suffix);
    print_cursor();

    let input = match read_line()? {
      Line::Text(input) => input,
      Line::TooLong => {
        log_warn!("input is longer than {} bytes, answering no", MAX_LINE_LEN);
        return Ok(false);
      }
      Line::Eof => String::new(),
    };
    let trimmed = input.trim();
    if trimmed.is_empty() {
      return Ok(default);
    }
    let first = trimmed.chars().next().unwrap_or_default();
    Ok(matches!(first, 'y' | 'Y'))
  }
}

impl Default for Wizard {
  fn default() -> Self {
    Self::new()
  }
}

fn map_inquire_err(err: InquireError) -> anyhow::Error {
  match err {
    InquireError::OperationCanceled | InquireError::OperationInterrupted => {
      InitError::Cancelled.into()
    }
    other => anyhow!(other),
  }
}

fn print_cursor() {
  anstream::print!("{}", "-> ".bright_cyan());
  io::stdout().flush().ok();
}

/// Outcome of reading one line from stdin.
#[derive(Debug, PartialEq, Eq)]
enum Line {
  /// Line content without the `\n` or `\r\n` terminator.
  Text(String),
  /// The line exceeded `MAX_LINE_LEN`; the rest of it was discarded.
  TooLong,
  /// Stdin was already at end of input.
  Eof,
}

fn read_line() -> Result<Line> {
  read_line_from(&mut io::stdin().lock())
}

fn read_line_from(reader: &mut impl Read) -> Result<Line> {
  let mut read_any = false;
  let mut too_long = false;
  let mut bytes = Vec::new();
  loop {
    let mut buf = [0u8; 1];
    match reader.read(&mut buf) {
      Ok(0) => break,
      Ok(_) => {
        read_any = true;
        if buf[0] == b'\n' {
          break;
        }
        if too_long {
          continue;
        }
        bytes.push(buf[0]);
        if bytes.len() > MAX_LINE_LEN + 1 {
          too_long = true;
          bytes.clear();
        }
      }
      Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
      Err(err) => {
        return Err(err).context("failed to read from stdin");
      }
    }
  }
  if !read_any {
    return Ok(Line::Eof);
  }
  if bytes.last() == Some(&b'\r') {
    bytes.pop();
  }
  if too_long || bytes.len() > MAX_LINE_LEN {
    return Ok(Line::TooLong);
  }
  Ok(Line::Text(String::from_utf8_lossy(&bytes).into_owned()))
}
