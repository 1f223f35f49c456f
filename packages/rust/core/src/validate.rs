//! Verification of an existing docset bundle.

use std::path::Path;

use tracing::{debug, instrument, warn};

use docsetgen_shared::{DocsetError, Result};
use docsetgen_storage::SearchIndex;

use crate::layout::{DOCSET_EXTENSION, DocsetLayout};
use crate::plist;

/// Verify that `bundle` is a well-formed docset. Returns the number of
/// search index rows.
///
/// A missing index page is reported in the logs but is not an error.
#[instrument(skip_all, fields(bundle = %bundle.display()))]
pub async fn validate_docset(bundle: &Path) -> Result<u64> {
    if !bundle.is_dir() {
        return Err(DocsetError::validation(format!(
            "{} is not a directory",
            bundle.display()
        )));
    }
    if bundle.extension().and_then(|e| e.to_str()) != Some(DOCSET_EXTENSION) {
        return Err(DocsetError::validation(format!(
            "bundle folder name must end in .{DOCSET_EXTENSION}"
        )));
    }

    let layout = DocsetLayout::at(bundle.to_path_buf());

    if !layout.info_plist.is_file() {
        return Err(DocsetError::validation("missing Contents/Info.plist"));
    }
    if !layout.documents.is_dir() {
        return Err(DocsetError::validation(
            "missing Contents/Resources/Documents/ directory",
        ));
    }
    if !layout.search_index.is_file() {
        return Err(DocsetError::validation(
            "missing Contents/Resources/docSet.dsidx",
        ));
    }

    let info = std::fs::read_to_string(&layout.info_plist)
        .map_err(|e| DocsetError::io(&layout.info_plist, e))?;
    if plist::string_value(&info, "CFBundleIdentifier").is_none() {
        return Err(DocsetError::validation(
            "Info.plist has no CFBundleIdentifier",
        ));
    }

    match plist::string_value(&info, "dashIndexFilePath") {
        Some(index) => {
            let page = index.split('#').next().unwrap_or_default();
            if !layout.documents.join(page).is_file() {
                warn!(index = %index, "index page missing from Documents (non-fatal)");
            }
        }
        None => debug!("Info.plist has no dashIndexFilePath"),
    }

    let index = SearchIndex::open(&layout.search_index).await?;
    if !index.has_table().await? {
        return Err(DocsetError::validation(
            "docSet.dsidx has no searchIndex table",
        ));
    }
    let count = index.count().await?;

    debug!(entries = count, "docset is valid");
    Ok(count)
}
