//! Filesystem helpers for bundle assembly.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use docsetgen_shared::{DocsetError, Result};
use tracing::trace;
use walkdir::WalkDir;

/// Resolve `path` to an absolute path. The longest prefix that exists is
/// canonicalized by the OS, so symlinks and any `..` after them follow real
/// filesystem semantics. `.` and `..` in the missing tail are folded
/// lexically. The path itself need not exist.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| DocsetError::io(path, e))?;
    let components: Vec<Component<'_>> = absolute.components().collect();

    let mut split = components.len();
    let mut resolved = loop {
        let prefix: PathBuf = components[..split].iter().collect();
        if split == 0 {
            break prefix;
        }
        if prefix.exists() {
            break fs::canonicalize(&prefix).map_err(|e| DocsetError::io(&prefix, e))?;
        }
        split -= 1;
    };

    for component in &components[split..] {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

/// Recursively copy the contents of `source` into `destination`, skipping
/// `exclude` and everything beneath it. Returns the number of files copied.
pub fn copy_tree(source: &Path, destination: &Path, exclude: Option<&Path>) -> Result<usize> {
    fs::create_dir_all(destination).map_err(|e| DocsetError::io(destination, e))?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| exclude.is_none_or(|skip| entry.path() != skip));

    let mut copied = 0;
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(source, e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| DocsetError::io(entry.path(), io::Error::other("outside copy root")))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| DocsetError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| DocsetError::io(entry.path(), e))?;
            trace!(from = %entry.path().display(), to = %target.display(), "copied file");
            copied += 1;
        }
    }
    Ok(copied)
}

/// Stream-copy a single file, creating or truncating `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let mut reader = File::open(from).map_err(|e| DocsetError::io(from, e))?;
    let mut writer = File::create(to).map_err(|e| DocsetError::io(to, e))?;
    io::copy(&mut reader, &mut writer).map_err(|e| DocsetError::io(to, e))
}

/// Remove a directory and everything beneath it.
pub fn remove_dir(path: &Path) -> Result<()> {
    fs::remove_dir_all(path).map_err(|e| DocsetError::io(path, e))
}

fn walk_error(root: &Path, err: walkdir::Error) -> DocsetError {
    let path = err.path().unwrap_or(root).to_path_buf();
    DocsetError::io(path, err.into())
}
