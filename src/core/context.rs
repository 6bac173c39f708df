//! Project context - build once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ProjectContext::build() -> &ProjectContext
//!   |
//!   v
//! commands/convert.rs, init.rs, converters.rs:
//!   fn run_*(ctx: &ProjectContext, ...)
//! ```

use crate::core::config::ConvertConfig;
use crate::core::error::{ConvertResult, ResultExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Project-level data shared by every command.
///
/// Config is wrapped in Arc so the batch engine can hand it to worker threads
/// without cloning the settings.
#[derive(Debug, Clone)]
pub struct ProjectContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// Loaded configuration, or built-in defaults when no file exists
  pub config: Arc<ConvertConfig>,
}

impl ProjectContext {
  /// Build the context for a project root, loading its configuration.
  pub fn build(project_root: &Path) -> ConvertResult<Self> {
    let root = project_root
      .canonicalize()
      .with_context(|| format!("Project root not found: {}", project_root.display()))?;
    let config = Arc::new(ConvertConfig::load(&root)?);

    Ok(Self { root, config })
  }

  /// Get project root as Path reference (convenience)
  pub fn project_root(&self) -> &Path {
    &self.root
  }
}
