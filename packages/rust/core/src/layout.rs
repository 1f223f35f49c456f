//! Fixed on-disk layout of a docset bundle.
//!
//! ```text
//! <identifier>.docset/
//! ├── icon.png                  (optional)
//! └── Contents/
//!     ├── Info.plist
//!     └── Resources/
//!         ├── docSet.dsidx
//!         └── Documents/
//! ```

use std::path::{Path, PathBuf};

pub const DOCSET_EXTENSION: &str = "docset";
pub const ICON_FILE: &str = "icon.png";
pub const INFO_PLIST_FILE: &str = "Info.plist";
pub const SEARCH_INDEX_FILE: &str = "docSet.dsidx";

const CONTENTS_DIR: &str = "Contents";
const RESOURCES_DIR: &str = "Resources";
const DOCUMENTS_DIR: &str = "Documents";

/// Absolute paths of every fixed part of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsetLayout {
    pub bundle: PathBuf,
    pub contents: PathBuf,
    pub resources: PathBuf,
    pub documents: PathBuf,
    pub icon: PathBuf,
    pub info_plist: PathBuf,
    pub search_index: PathBuf,
}

impl DocsetLayout {
    /// Layout of `<destination_root>/<identifier>.docset`.
    pub fn new(destination_root: &Path, identifier: &str) -> Self {
        Self::at(destination_root.join(format!("{identifier}.{DOCSET_EXTENSION}")))
    }

    /// Layout rooted at an existing bundle folder.
    pub fn at(bundle: PathBuf) -> Self {
        let contents = bundle.join(CONTENTS_DIR);
        let resources = contents.join(RESOURCES_DIR);
        Self {
            icon: bundle.join(ICON_FILE),
            info_plist: contents.join(INFO_PLIST_FILE),
            search_index: resources.join(SEARCH_INDEX_FILE),
            documents: resources.join(DOCUMENTS_DIR),
            bundle,
            contents,
            resources,
        }
    }
}
