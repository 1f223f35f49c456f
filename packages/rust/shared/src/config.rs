//! Docset configuration files.
//!
//! A build is described by a `docset.toml` (or `.json`) file holding a
//! [`DocsetConfig`]. Search entries can live in the same file or in a
//! separate JSON array. CLI flags override config file values, which
//! override defaults.

use std::path::{Path, PathBuf};

use crate::error::{DocsetError, Result};
use crate::types::{DocsetConfig, SearchEntry};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "docset.toml";

/// Commented template written by `write_starter_config`.
pub const STARTER_CONFIG: &str = r#"# docsetgen build configuration

# Root of the HTML documentation tree (required).
documentation = "docs/html"

# Display name of the docset (required).
name = "MyLib"

# Folder in which <identifier>.docset is created. Defaults to `documentation`.
# destination = "out"

# Bundle identifier and folder name. Defaults to `name`.
# identifier = "mylib"

# Default page, relative to `documentation`.
index = "index.html"

enable_javascript = false

# Defaults to `name`.
# platform_family = "mylib"

# icon = "assets/icon.png"

# [[entries]]
# name = "foo"
# type = "Function"
# path = "api.html#foo"
"#;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a docset config from a TOML file, or JSON when the extension is `.json`.
///
/// Relative `documentation`, `destination`, and `icon` paths are resolved
/// against the directory holding the config file.
pub fn load_config_from(path: &Path) -> Result<DocsetConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;

    let parsed = if is_json(path) {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };

    let mut config: DocsetConfig = parsed.map_err(|e| {
        DocsetError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    if let Some(base) = path.parent() {
        rebase_paths(&mut config, base);
    }
    tracing::debug!(?path, entries = config.entries.len(), "loaded docset config");
    Ok(config)
}

/// Load search entries from a JSON array of `{name, type, path}` objects.
pub fn load_entries_from(path: &Path) -> Result<Vec<SearchEntry>> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;

    let entries: Vec<SearchEntry> = serde_json::from_str(&content).map_err(|e| {
        DocsetError::config(format!("failed to parse entries {}: {e}", path.display()))
    })?;
    tracing::debug!(?path, count = entries.len(), "loaded search entries");
    Ok(entries)
}

/// Write [`STARTER_CONFIG`] to `path`, or to `./docset.toml` when `None`.
/// Refuses to overwrite an existing file. Returns the written path.
pub fn write_starter_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), Path::to_path_buf);

    if path.exists() {
        return Err(DocsetError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }
    std::fs::write(&path, STARTER_CONFIG).map_err(|e| DocsetError::io(&path, e))?;
    tracing::info!(?path, "created starter config file");

    Ok(path)
}

fn rebase_paths(config: &mut DocsetConfig, base: &Path) {
    let rebase = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };
    rebase(&mut config.documentation);
    if let Some(destination) = config.destination.as_mut() {
        rebase(destination);
    }
    if let Some(icon) = config.icon.as_mut() {
        rebase(icon);
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
