//! Core domain types for docset bundles.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default page opened when the docset is selected in a browser.
pub const DEFAULT_INDEX_FILE: &str = "index.html";

// ---------------------------------------------------------------------------
// SearchEntry
// ---------------------------------------------------------------------------

/// One row of the docset search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    /// Symbol or page name shown in search results.
    pub name: String,
    /// Category label such as `Function` or `Class`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Path relative to the documentation root, optionally with an anchor.
    pub path: String,
}

impl SearchEntry {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            path: path.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DocsetConfig
// ---------------------------------------------------------------------------

/// Input for building a docset bundle.
///
/// Optional fields fall back to other fields rather than to constants:
/// - `destination` defaults to `documentation` (the bundle is written next
///   to, and in place of, the documentation tree)
/// - `identifier` and `platform_family` default to `name`
///
/// Use the accessor methods to read the effective values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsetConfig {
    /// Root of the HTML documentation tree to package.
    pub documentation: PathBuf,

    /// Folder in which `<identifier>.docset` is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,

    /// Display name of the docset.
    pub name: String,

    /// Bundle identifier, also used as the bundle folder name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// Default page, relative to the documentation root.
    #[serde(default = "default_index")]
    pub index: String,

    /// Whether the browser should run JavaScript inside the docset.
    #[serde(default)]
    pub enable_javascript: bool,

    /// Platform family keyword used by browsers for search scoping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_family: Option<String>,

    /// PNG icon copied to the bundle root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,

    /// Search index rows, inserted in this order.
    #[serde(default)]
    pub entries: Vec<SearchEntry>,

    /// Emit step-by-step build logs.
    #[serde(default)]
    pub verbose: bool,
}

fn default_index() -> String {
    DEFAULT_INDEX_FILE.into()
}

impl DocsetConfig {
    /// Config with the two required fields set and everything else defaulted.
    pub fn new(documentation: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            documentation: documentation.into(),
            destination: None,
            name: name.into(),
            identifier: None,
            index: default_index(),
            enable_javascript: false,
            platform_family: None,
            icon: None,
            entries: Vec::new(),
            verbose: false,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_entries(mut self, entries: Vec<SearchEntry>) -> Self {
        self.entries = entries;
        self
    }

    /// Effective destination root: `destination`, or `documentation` when unset.
    pub fn destination(&self) -> &Path {
        self.destination.as_deref().unwrap_or(self.documentation.as_path())
    }

    /// Effective identifier: `identifier`, or `name` when unset.
    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or(self.name.as_str())
    }

    /// Effective platform family: `platform_family`, or `name` when unset.
    pub fn platform_family(&self) -> &str {
        self.platform_family.as_deref().unwrap_or(self.name.as_str())
    }
}
