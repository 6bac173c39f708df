//! Utility functions for cross-platform path handling

use std::path::Path;

/// Convert a path to forward-slash format
///
/// Plans, reports and glob matching always use forward slashes, even on Windows.
pub fn path_to_slash_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// `path` relative to `root` in forward-slash format; paths outside `root` are
/// shown as given
pub fn relative_display(root: &Path, path: &Path) -> String {
  match path.strip_prefix(root) {
    Ok(rel) if !rel.as_os_str().is_empty() => path_to_slash_format(rel),
    _ => path_to_slash_format(path),
  }
}

/// Check if a path names a C# source file (`.cs`, any case)
pub fn is_csharp_source(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
}
