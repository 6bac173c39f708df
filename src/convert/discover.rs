//! Finding the documents to convert

use crate::core::config::ConvertSettings;
use crate::core::error::{ConvertError, ConvertResult};
use crate::utils::{is_csharp_source, relative_display};
use glob::{MatchOptions, Pattern};
use log::debug;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Include/exclude globs, matched against forward-slash paths relative to the project root
#[derive(Debug, Clone)]
pub struct DocumentFilter {
  include: Vec<Pattern>,
  exclude: Vec<Pattern>,
}

impl DocumentFilter {
  pub fn new(include: &[String], exclude: &[String]) -> ConvertResult<Self> {
    let compile = |patterns: &[String]| -> ConvertResult<Vec<Pattern>> {
      patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(ConvertError::from))
        .collect()
    };
    Ok(Self {
      include: compile(include)?,
      exclude: compile(exclude)?,
    })
  }

  pub fn from_settings(settings: &ConvertSettings) -> ConvertResult<Self> {
    Self::new(&settings.include, &settings.exclude)
  }

  fn options() -> MatchOptions {
    MatchOptions {
      case_sensitive: true,
      require_literal_separator: false,
      require_literal_leading_dot: false,
    }
  }

  pub fn is_excluded(&self, relative: &str) -> bool {
    self.exclude.iter().any(|p| p.matches_with(relative, Self::options()))
  }

  pub fn matches(&self, relative: &str) -> bool {
    self.include.iter().any(|p| p.matches_with(relative, Self::options())) && !self.is_excluded(relative)
  }
}

/// Collect documents under `targets`, sorted and deduplicated
///
/// Directories are walked and filtered through `filter`. Files named explicitly
/// are taken as long as they are C# sources, whatever the globs say.
pub fn discover(root: &Path, targets: &[PathBuf], filter: &DocumentFilter) -> ConvertResult<Vec<PathBuf>> {
  let mut found = BTreeSet::new();

  for target in targets {
    let target = if target.is_absolute() {
      target.clone()
    } else {
      root.join(target)
    };

    if target.is_file() {
      if is_csharp_source(&target) {
        found.insert(target);
      } else {
        debug!("skipping {}: not a C# source", target.display());
      }
      continue;
    }

    if !target.is_dir() {
      return Err(ConvertError::with_help(
        format!("Path not found: {}", target.display()),
        "Pass a .cs file or a directory containing C# sources",
      ));
    }

    let pattern = format!("{}/**/*", Pattern::escape(&target.to_string_lossy()));
    let entries = glob::glob(&pattern)?;
    for entry in entries {
      let path = match entry {
        Ok(path) => path,
        Err(e) => {
          debug!("skipping unreadable entry: {}", e);
          continue;
        }
      };
      if !path.is_file() {
        continue;
      }
      let relative = relative_display(root, &path);
      if filter.matches(&relative) {
        found.insert(path);
      }
    }
  }

  Ok(found.into_iter().collect())
}
