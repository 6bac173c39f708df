use crate::core::error::{ConfigError, ConvertResult, ResultExt};
use crate::rewrite::ConverterKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{Array, DocumentMut, Item, Table, value};

/// Default file name written by `xunit-convert init`
pub const CONFIG_FILE_NAME: &str = "xunit-convert.toml";

/// Configuration for xunit-convert
/// Searched in order: xunit-convert.toml, .xunit-convert.toml, .config/xunit-convert.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertConfig {
  #[serde(default)]
  pub convert: ConvertSettings,

  /// File the configuration was read from (`None` for built-in defaults)
  #[serde(skip)]
  pub source: Option<PathBuf>,
}

/// The `[convert]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertSettings {
  /// Converters to run, in order
  #[serde(default = "default_converters")]
  pub converters: Vec<ConverterKind>,

  /// Globs (relative to the project root) selecting documents
  #[serde(default = "default_include")]
  pub include: Vec<String>,

  /// Globs excluding documents, checked after `include`
  #[serde(default = "default_exclude")]
  pub exclude: Vec<String>,

  /// Convert documents on all cores
  #[serde(default = "default_parallel")]
  pub parallel: bool,
}

fn default_converters() -> Vec<ConverterKind> {
  ConverterKind::ALL.to_vec()
}

fn default_include() -> Vec<String> {
  vec!["**/*.cs".to_string()]
}

fn default_exclude() -> Vec<String> {
  vec!["**/bin/**".to_string(), "**/obj/**".to_string()]
}

fn default_parallel() -> bool {
  true
}

impl Default for ConvertSettings {
  fn default() -> Self {
    Self {
      converters: default_converters(),
      include: default_include(),
      exclude: default_exclude(),
      parallel: default_parallel(),
    }
  }
}

impl ConvertSettings {
  /// Validate against the file the settings came from
  pub fn validate(&self, path: &Path) -> ConvertResult<()> {
    if self.converters.is_empty() {
      return Err(ConfigError::NoConverters { path: path.to_path_buf() }.into());
    }

    let mut seen = HashSet::new();
    for converter in &self.converters {
      if !seen.insert(converter) {
        return Err(
          ConfigError::DuplicateConverter {
            path: path.to_path_buf(),
            name: converter.name().to_string(),
          }
          .into(),
        );
      }
    }

    for pattern in self.include.iter().chain(&self.exclude) {
      if let Err(e) = glob::Pattern::new(pattern) {
        return Err(
          ConfigError::InvalidPattern {
            path: path.to_path_buf(),
            pattern: pattern.clone(),
            reason: e.msg.to_string(),
          }
          .into(),
        );
      }
    }

    Ok(())
  }
}

impl ConvertConfig {
  /// Find config file in search order: xunit-convert.toml, .xunit-convert.toml, .config/xunit-convert.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join(CONFIG_FILE_NAME),
      path.join(".xunit-convert.toml"),
      path.join(".config").join(CONFIG_FILE_NAME),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the config for a project root; built-in defaults when no file exists
  pub fn load(path: &Path) -> ConvertResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config: ConvertConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.convert.validate(&config_path)?;
    config.source = Some(config_path);

    Ok(config)
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// The default configuration as a commented TOML document
  pub fn default_document() -> DocumentMut {
    let defaults = ConvertSettings::default();
    let mut doc = DocumentMut::new();

    let mut table = Table::new();
    table.decor_mut().set_prefix(
      "# xunit-convert configuration\n\
       # Converters run in the order listed; see `xunit-convert converters`.\n",
    );

    let converters: Array = defaults.converters.iter().map(|c| c.name()).collect();
    table.insert("converters", value(converters));

    let include: Array = defaults.include.iter().map(String::as_str).collect();
    table.insert("include", value(include));
    if let Some(mut key) = table.key_mut("include") {
      key.leaf_decor_mut().set_prefix("\n# Documents to convert, relative to this file\n");
    }

    let exclude: Array = defaults.exclude.iter().map(String::as_str).collect();
    table.insert("exclude", value(exclude));

    table.insert("parallel", value(defaults.parallel));
    if let Some(mut key) = table.key_mut("parallel") {
      key.leaf_decor_mut().set_prefix("\n# Convert documents on all cores\n");
    }

    doc.insert("convert", Item::Table(table));
    doc
  }

  /// Write the default configuration to `root/xunit-convert.toml`
  pub fn write_default(root: &Path, force: bool) -> ConvertResult<PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
      return Err(ConfigError::AlreadyExists { path: config_path }.into());
    }

    fs::write(&config_path, Self::default_document().to_string())
      .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }
}
