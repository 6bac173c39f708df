use crate::core::config::{CONFIG_FILE_NAME, ConvertConfig};
use crate::core::error::ConvertResult;
use std::path::Path;

/// Run the init command: write a commented default xunit-convert.toml
pub fn run_init(project_root: &Path, force: bool) -> ConvertResult<()> {
  let target = project_root.join(CONFIG_FILE_NAME);
  let shadowed = ConvertConfig::find_config_path(project_root).filter(|p| *p != target);

  let path = ConvertConfig::write_default(project_root, force)?;

  println!("✅ Wrote {}", path.display());
  if let Some(other) = shadowed {
    println!("ℹ️  It now takes precedence over {}", other.display());
  }

  println!("\n📌 Next steps:");
  println!("   1. Review the converters and globs under [convert]");
  println!("   2. Preview the changes: xunit-convert convert");
  println!("   3. Apply them:          xunit-convert convert --apply");

  Ok(())
}
