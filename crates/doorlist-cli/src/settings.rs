//! Application configuration.
//!
//! Loaded from an optional TOML file layered with `DOORLIST_`-prefixed
//! environment variables (nested keys use `__`, e.g.
//! `DOORLIST_SOURCES__READERS`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use doorlist_xlsx::SheetLayout;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default = "default_output_dir")]
  pub output_dir: PathBuf,
  /// Only required by `build`.
  pub sources:    Option<SourcePaths>,
  #[serde(default)]
  pub layouts:    Layouts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcePaths {
  pub readers:        PathBuf,
  pub people:         PathBuf,
  pub authorizations: PathBuf,
  pub abi_locations:  Option<PathBuf>,
  pub reader_list:    Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Layouts {
  #[serde(default = "SheetLayout::readers")]
  pub readers:        SheetLayout,
  #[serde(default = "SheetLayout::people")]
  pub people:         SheetLayout,
  #[serde(default = "SheetLayout::authorizations")]
  pub authorizations: SheetLayout,
  #[serde(default = "SheetLayout::abi_locations")]
  pub abi_locations:  SheetLayout,
  #[serde(default = "SheetLayout::reader_list")]
  pub reader_list:    SheetLayout,
}

impl Default for Layouts {
  fn default() -> Self {
    Self {
      readers:        SheetLayout::readers(),
      people:         SheetLayout::people(),
      authorizations: SheetLayout::authorizations(),
      abi_locations:  SheetLayout::abi_locations(),
      reader_list:    SheetLayout::reader_list(),
    }
  }
}

fn default_store_path() -> PathBuf { PathBuf::from("doorlist.db") }

fn default_output_dir() -> PathBuf { PathBuf::from("output_documents") }

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("DOORLIST")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.output_dir = expand_tilde(&cfg.output_dir);
    if let Some(sources) = cfg.sources.as_mut() {
      for path in [&mut sources.readers, &mut sources.people, &mut sources.authorizations] {
        *path = expand_tilde(path);
      }
      for path in [sources.abi_locations.as_mut(), sources.reader_list.as_mut()]
        .into_iter()
        .flatten()
      {
        *path = expand_tilde(path);
      }
    }
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::{io::Write as _, sync::Mutex};

  use super::*;

  /// Serialises tests that read or write `DOORLIST_*` variables.
  static ENV_LOCK: Mutex<()> = Mutex::new(());

  fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    write!(file, "{contents}").unwrap();
    file
  }

  #[test]
  fn defaults_without_a_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let cfg = AppConfig::load(Path::new("/nonexistent/doorlist.toml")).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("doorlist.db"));
    assert!(cfg.sources.is_none());
    assert_eq!(cfg.layouts, Layouts::default());
  }

  #[test]
  fn file_overrides_layouts_and_sources() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config(
      r#"
store_path = "access.db"

[sources]
readers        = "in/readers.xlsx"
people         = "in/people.xlsx"
authorizations = "in/auth.xlsx"
reader_list    = "in/velin.xlsx"

[layouts.readers]
header_rows = 1
columns     = [1, 2, 3]
"#,
    );

    let cfg = AppConfig::load(file.path()).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("access.db"));

    let sources = cfg.sources.unwrap();
    assert_eq!(sources.readers, PathBuf::from("in/readers.xlsx"));
    assert!(sources.abi_locations.is_none());
    assert_eq!(sources.reader_list, Some(PathBuf::from("in/velin.xlsx")));

    assert_eq!(cfg.layouts.readers, SheetLayout::new([1, 2, 3]).with_header_rows(1));
    assert_eq!(cfg.layouts.people, SheetLayout::people());
  }

  #[test]
  fn environment_overrides_file_values() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config(
      r#"
store_path = "from_file.db"

[sources]
readers        = "file/readers.xlsx"
people         = "file/people.xlsx"
authorizations = "file/auth.xlsx"
"#,
    );

    // SAFETY: every test touching these variables holds ENV_LOCK.
    unsafe {
      std::env::set_var("DOORLIST_STORE_PATH", "from_env.db");
      std::env::set_var("DOORLIST_SOURCES__READERS", "env/readers.xlsx");
    }
    let cfg = AppConfig::load(file.path());
    unsafe {
      std::env::remove_var("DOORLIST_STORE_PATH");
      std::env::remove_var("DOORLIST_SOURCES__READERS");
    }

    let cfg = cfg.unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("from_env.db"));
    let sources = cfg.sources.unwrap();
    assert_eq!(sources.readers, PathBuf::from("env/readers.xlsx"));
    assert_eq!(sources.people, PathBuf::from("file/people.xlsx"));
  }
}
