//! Error types for xunit-convert with contextual messages and exit codes
//!
//! Every error maps to an exit code and, where one exists, a suggestion that
//! points the user at the fix.

use crate::rewrite::RewriteError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for xunit-convert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (I/O)
  System = 2,
  /// Validation failure (documents that could not be converted, `--strict` drift)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for xunit-convert
#[derive(Debug)]
pub enum ConvertError {
  /// Configuration errors
  Config(ConfigError),

  /// A document could not be rewritten
  Rewrite { path: PathBuf, source: RewriteError },

  /// Some documents in a batch could not be converted
  Batch { failed: usize, total: usize },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ConvertError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ConvertError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ConvertError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ConvertError::Message { message, context, help } => ConvertError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ConvertError::Io(err) => ConvertError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ConvertError::Config(_) => ExitCode::User,
      ConvertError::Rewrite { .. } => ExitCode::Validation,
      ConvertError::Batch { .. } => ExitCode::Validation,
      ConvertError::Io(_) => ExitCode::System,
      ConvertError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ConvertError::Config(e) => e.help_message(),
      ConvertError::Rewrite { source, .. } => match source {
        RewriteError::MalformedArity { .. } => {
          Some("Fix the attribute by hand; the document was left untouched.".to_string())
        }
      },
      ConvertError::Batch { .. } => Some(
        "The failed documents were left untouched; every other document was converted. Fix them and re-run."
          .to_string(),
      ),
      ConvertError::Message { help, .. } => help.clone(),
      ConvertError::Io(_) => None,
    }
  }
}

impl fmt::Display for ConvertError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConvertError::Config(e) => write!(f, "{}", e),
      ConvertError::Rewrite { path, source } => write!(f, "{}: {}", path.display(), source),
      ConvertError::Batch { failed, total } => {
        write!(f, "{} of {} document(s) could not be converted", failed, total)
      }
      ConvertError::Io(e) => write!(f, "I/O error: {}", e),
      ConvertError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ConvertError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ConvertError::Io(e) => Some(e),
      ConvertError::Rewrite { source, .. } => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for ConvertError {
  fn from(err: io::Error) -> Self {
    ConvertError::Io(err)
  }
}

impl From<String> for ConvertError {
  fn from(msg: String) -> Self {
    ConvertError::message(msg)
  }
}

impl From<&str> for ConvertError {
  fn from(msg: &str) -> Self {
    ConvertError::message(msg)
  }
}

impl From<ConfigError> for ConvertError {
  fn from(err: ConfigError) -> Self {
    ConvertError::Config(err)
  }
}

impl From<toml_edit::de::Error> for ConvertError {
  fn from(err: toml_edit::de::Error) -> Self {
    ConvertError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for ConvertError {
  fn from(err: serde_json::Error) -> Self {
    ConvertError::message(format!("JSON error: {}", err))
  }
}

impl From<glob::PatternError> for ConvertError {
  fn from(err: glob::PatternError) -> Self {
    ConvertError::message(format!("Invalid glob pattern: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ConvertError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ConvertError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// The converter list is empty
  NoConverters { path: PathBuf },

  /// A converter appears twice
  DuplicateConverter { path: PathBuf, name: String },

  /// An include/exclude glob does not parse
  InvalidPattern { path: PathBuf, pattern: String, reason: String },

  /// `init` would overwrite an existing file
  AlreadyExists { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NoConverters { .. } => Some(
        "List at least one converter under [convert], e.g. converters = [\"ignore-to-skip\"]. \
         Run `xunit-convert converters` to see them all."
          .to_string(),
      ),
      ConfigError::DuplicateConverter { .. } => Some("Each converter runs once; remove the duplicate entry.".to_string()),
      ConfigError::InvalidPattern { .. } => Some("Patterns use glob syntax, e.g. \"**/*.cs\" or \"**/obj/**\".".to_string()),
      ConfigError::AlreadyExists { .. } => Some("Pass --force to overwrite it.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NoConverters { path } => {
        write!(f, "No converters configured in {}", path.display())
      }
      ConfigError::DuplicateConverter { path, name } => {
        write!(f, "Converter '{}' listed more than once in {}", name, path.display())
      }
      ConfigError::InvalidPattern { path, pattern, reason } => {
        write!(f, "Invalid pattern '{}' in {}: {}", pattern, path.display(), reason)
      }
      ConfigError::AlreadyExists { path } => {
        write!(f, "Configuration already exists: {}", path.display())
      }
    }
  }
}

/// Result type alias for xunit-convert
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ConvertResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ConvertResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ConvertError>,
{
  fn context(self, ctx: impl Into<String>) -> ConvertResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ConvertResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ConvertError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
