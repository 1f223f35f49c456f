//! Docset bundle assembler.
//!
//! Validates a [`DocsetConfig`], lays out the bundle skeleton, copies the
//! documentation and icon, writes `Info.plist`, and fills the search index.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use docsetgen_shared::{DocsetConfig, DocsetError, Result};
use docsetgen_storage::SearchIndex;

use crate::fsutil;
use crate::layout::DocsetLayout;
use crate::plist::InfoPlist;

/// Output from a successful docset build.
#[derive(Debug, Clone)]
pub struct DocsetBuild {
    /// Absolute path to the `.docset` folder.
    pub bundle_path: PathBuf,
    /// Number of documentation files copied into `Documents/`.
    pub files_copied: usize,
    /// Number of rows written to the search index.
    pub entry_count: usize,
    /// Whether an icon was copied to the bundle root.
    pub icon_copied: bool,
    pub elapsed: Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the build completes.
    fn done(&self, build: &DocsetBuild);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _build: &DocsetBuild) {}
}

/// Builds one docset bundle from a validated configuration.
///
/// Construction performs every check and path resolution up front and never
/// touches the filesystem beyond reading metadata. [`DocsetAssembler::create`]
/// consumes the assembler, so each build starts from a fresh instance.
#[derive(Debug)]
pub struct DocsetAssembler {
    config: DocsetConfig,
    icon: Option<PathBuf>,
    documentation: PathBuf,
    destination_root: PathBuf,
    self_contained: bool,
    layout: DocsetLayout,
}

impl DocsetAssembler {
    /// Validate `config` and precompute the bundle layout.
    pub fn new(config: DocsetConfig) -> Result<Self> {
        // Checked on the resolved path so `..` after a symlink means the same
        // folder here as in the copy step.
        let documentation = fsutil::resolve_path(&config.documentation)
            .ok()
            .filter(|path| path.exists())
            .ok_or_else(|| {
                DocsetError::config(format!(
                    "documentation path does not exist: {}",
                    config.documentation.display()
                ))
            })?;
        if !documentation.is_dir() {
            return Err(DocsetError::config(format!(
                "documentation path is not a directory: {}",
                config.documentation.display()
            )));
        }
        if config.name.trim().is_empty() {
            return Err(DocsetError::config("docset name must not be blank"));
        }

        let identifier = config.identifier();
        if identifier.trim().is_empty() {
            return Err(DocsetError::config("docset identifier must not be blank"));
        }
        if identifier.contains(['/', '\\']) {
            return Err(DocsetError::config(format!(
                "docset identifier must not contain path separators: {identifier}"
            )));
        }

        let destination_root = fsutil::resolve_path(config.destination())?;
        let self_contained = documentation == destination_root;

        if !self_contained && destination_root.starts_with(&documentation) {
            return Err(DocsetError::config(format!(
                "docset destination {} can't be a subfolder of the documentation folder {}",
                destination_root.display(),
                documentation.display()
            )));
        }

        let layout = DocsetLayout::new(&destination_root, identifier);

        // The bundle is deleted before the copy, so it cannot hold the source.
        if documentation.starts_with(&layout.bundle) {
            return Err(DocsetError::config(format!(
                "documentation folder {} lies inside the bundle {} that is rebuilt",
                documentation.display(),
                layout.bundle.display()
            )));
        }

        let icon = config
            .icon
            .as_deref()
            .map(|path| fsutil::resolve_path(path).unwrap_or_else(|_| path.to_path_buf()));

        Ok(Self {
            config,
            icon,
            documentation,
            destination_root,
            self_contained,
            layout,
        })
    }

    pub fn layout(&self) -> &DocsetLayout {
        &self.layout
    }

    /// Resolved documentation source.
    pub fn documentation(&self) -> &Path {
        &self.documentation
    }

    /// Resolved folder the bundle is created in.
    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Whether documentation and destination resolve to the same folder.
    pub fn is_self_contained(&self) -> bool {
        self.self_contained
    }

    /// Build the bundle.
    ///
    /// 1. Relocate the documentation when it is also the destination
    /// 2. Recreate the bundle skeleton
    /// 3. Copy documentation into `Documents/`
    /// 4. Copy the icon, if one exists
    /// 5. Write `Info.plist`
    /// 6. Reset and populate the search index
    ///
    /// Any failure aborts the remaining steps. Files already written stay on
    /// disk.
    #[instrument(skip_all, fields(name = %self.config.name, identifier = %self.config.identifier()))]
    pub async fn create(self, progress: &dyn ProgressReporter) -> Result<DocsetBuild> {
        let start = Instant::now();

        info!(
            documentation = %self.documentation.display(),
            bundle = %self.layout.bundle.display(),
            entries = self.config.entries.len(),
            "building docset"
        );

        let relocated = if self.self_contained {
            progress.phase("Relocating documentation");
            Some(self.relocate_documentation()?)
        } else {
            None
        };
        let source = relocated.as_deref().unwrap_or(self.documentation.as_path());

        let files_copied = match (self.fill_documents(source, progress), &relocated) {
            (Ok(count), _) => count,
            (Err(e), Some(copy)) => {
                warn!(
                    copy = %copy.display(),
                    error = %e,
                    "build failed; documentation remains at the relocated copy"
                );
                return Err(DocsetError::relocated(copy, e));
            }
            (Err(e), None) => return Err(e),
        };

        if let Some(tmp) = &relocated {
            if let Err(e) = fsutil::remove_dir(tmp) {
                warn!(error = %e, "failed to remove relocated documentation copy");
            }
        }

        progress.phase("Copying icon");
        let icon_copied = self.copy_icon()?;

        progress.phase("Writing Info.plist");
        self.write_info_plist()?;

        progress.phase("Populating search index");
        let index = SearchIndex::create(&self.layout.search_index).await?;
        let entry_count = index.insert_entries(&self.config.entries).await?;
        self.step("search index populated", index.path());

        let build = DocsetBuild {
            bundle_path: self.layout.bundle.clone(),
            files_copied,
            entry_count,
            icon_copied,
            elapsed: start.elapsed(),
        };
        progress.done(&build);

        info!(
            path = %build.bundle_path.display(),
            files = files_copied,
            entries = entry_count,
            "docset build complete"
        );

        Ok(build)
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    /// Move the documentation out of the way so the bundle can be built in
    /// its place. Returns the temporary copy.
    fn relocate_documentation(&self) -> Result<PathBuf> {
        let tmp = std::env::temp_dir().join(format!(
            "docsetgen-documentation-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S"),
            Uuid::now_v7().simple()
        ));

        // A bundle left by a previous build must not end up in Documents.
        fsutil::copy_tree(&self.documentation, &tmp, Some(&self.layout.bundle))?;

        info!(
            copy = %tmp.display(),
            original = %self.documentation.display(),
            "documentation copied aside; removing original"
        );
        fsutil::remove_dir(&self.documentation).map_err(|e| DocsetError::relocated(&tmp, e))?;

        Ok(tmp)
    }

    /// Scaffold the bundle and copy `source` into `Documents/`.
    fn fill_documents(&self, source: &Path, progress: &dyn ProgressReporter) -> Result<usize> {
        progress.phase("Creating folder structure");
        self.create_dirs()?;

        progress.phase("Copying documentation");
        let files_copied = fsutil::copy_tree(source, &self.layout.documents, None)?;
        self.step("documentation copied", &self.layout.documents);
        Ok(files_copied)
    }

    /// Recreate the bundle skeleton, removing any previous bundle.
    fn create_dirs(&self) -> Result<()> {
        let root = &self.destination_root;
        if !root.exists() {
            std::fs::create_dir_all(root).map_err(|e| DocsetError::io(root, e))?;
        }

        let bundle = &self.layout.bundle;
        if bundle.exists() {
            self.step("removing existing bundle", bundle);
            fsutil::remove_dir(bundle)?;
        }

        let documents = &self.layout.documents;
        std::fs::create_dir_all(documents).map_err(|e| DocsetError::io(documents, e))?;
        self.step("folder structure created", documents);
        Ok(())
    }

    fn copy_icon(&self) -> Result<bool> {
        let Some(icon) = &self.icon else {
            info!("no icon specified");
            return Ok(false);
        };

        // The original tree is gone after relocation; read from Documents.
        let icon = match icon.strip_prefix(&self.documentation) {
            Ok(relative) if self.self_contained => self.layout.documents.join(relative),
            _ => icon.clone(),
        };

        if !icon.is_file() {
            info!(icon = %icon.display(), "icon not found, skipping");
            return Ok(false);
        }

        fsutil::copy_file(&icon, &self.layout.icon)?;
        self.step("icon copied", &self.layout.icon);
        Ok(true)
    }

    fn write_info_plist(&self) -> Result<()> {
        let plist = InfoPlist {
            identifier: self.config.identifier(),
            name: &self.config.name,
            platform_family: self.config.platform_family(),
            index: &self.config.index,
            enable_javascript: self.config.enable_javascript,
        };

        let path = &self.layout.info_plist;
        std::fs::write(path, plist.render()).map_err(|e| DocsetError::io(path, e))?;
        self.step("Info.plist written", path);
        Ok(())
    }

    /// Step-level log line, promoted to `info` in verbose mode.
    fn step(&self, message: &str, path: &Path) {
        if self.config.verbose {
            info!(path = %path.display(), "{message}");
        } else {
            debug!(path = %path.display(), "{message}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use docsetgen_shared::SearchEntry;
    use walkdir::WalkDir;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "docsetgen-assembler-test-{}",
            Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::canonicalize(&dir).unwrap()
    }

    /// Write a small documentation tree and return its root.
    fn make_docs(root: &Path) -> PathBuf {
        let docs = root.join("html");
        std::fs::create_dir_all(docs.join("css")).unwrap();
        std::fs::create_dir_all(docs.join("api/deep")).unwrap();
        std::fs::write(docs.join("index.html"), "<h1>MyLib</h1>").unwrap();
        std::fs::write(docs.join("api.html"), "<a name=\"foo\"></a>").unwrap();
        std::fs::write(docs.join("css/style.css"), "body { margin: 0 }").unwrap();
        std::fs::write(docs.join("api/deep/page.html"), [0u8, 1, 2, 254, 255]).unwrap();
        docs
    }

    /// Relative path -> bytes for every file under `root`.
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(root)
            .into_iter()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                (
                    e.path().strip_prefix(root).unwrap().to_path_buf(),
                    std::fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    fn entries() -> Vec<SearchEntry> {
        vec![
            SearchEntry::new("foo", "Function", "api.html#foo"),
            SearchEntry::new("Widget", "Class", "api/deep/page.html"),
        ]
    }

    async fn indexed(layout: &DocsetLayout) -> Vec<SearchEntry> {
        SearchIndex::open(&layout.search_index)
            .await
            .unwrap()
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.entry)
            .collect()
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
        finished: Mutex<bool>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }

        fn done(&self, _build: &DocsetBuild) {
            *self.finished.lock().unwrap() = true;
        }
    }

    #[tokio::test]
    async fn builds_expected_layout() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let out = tmp.join("out");
        let config = DocsetConfig::new(&docs, "MyLib")
            .with_destination(&out)
            .with_entries(vec![SearchEntry::new("foo", "Function", "api.html#foo")]);

        let assembler = DocsetAssembler::new(config).unwrap();
        let layout = assembler.layout().clone();
        let build = assembler.create(&SilentProgress).await.unwrap();

        assert_eq!(build.bundle_path, out.join("MyLib.docset"));
        assert_eq!(build.files_copied, 4);
        assert_eq!(build.entry_count, 1);
        assert!(!build.icon_copied);

        assert!(layout.documents.is_dir());
        assert!(layout.info_plist.is_file());
        assert!(layout.search_index.is_file());
        assert!(!layout.icon.exists());

        assert_eq!(snapshot(&layout.documents), snapshot(&docs));

        let plist = std::fs::read_to_string(&layout.info_plist).unwrap();
        assert!(plist.contains("<key>CFBundleIdentifier</key>\n\t<string>MyLib</string>"));

        assert_eq!(
            indexed(&layout).await,
            [SearchEntry::new("foo", "Function", "api.html#foo")]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn manifest_reflects_config() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let mut config = DocsetConfig::new(&docs, "My Lib")
            .with_destination(tmp.join("out"))
            .with_identifier("mylib");
        config.index = "api.html".into();
        config.enable_javascript = true;

        let assembler = DocsetAssembler::new(config).unwrap();
        let layout = assembler.layout().clone();
        assembler.create(&SilentProgress).await.unwrap();

        assert_eq!(layout.bundle, tmp.join("out/mylib.docset"));
        let plist = std::fs::read_to_string(&layout.info_plist).unwrap();
        assert!(plist.contains("<string>mylib</string>"));
        assert!(plist.contains("<key>CFBundleName</key>\n\t<string>My Lib</string>"));
        assert!(plist.contains("<key>DocSetPlatformFamily</key>\n\t<string>My Lib</string>"));
        assert!(plist.contains("<key>dashIndexFilePath</key>\n\t<string>api.html</string>"));
        assert!(plist.contains("<key>isJavaScriptEnabled</key>\n\t<true/>"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_bundle() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let out = tmp.join("out");

        let first = DocsetConfig::new(&docs, "MyLib")
            .with_destination(&out)
            .with_entries(entries());
        let layout = DocsetAssembler::new(first)
            .unwrap()
            .create(&SilentProgress)
            .await
            .map(|build| DocsetLayout::at(build.bundle_path))
            .unwrap();

        std::fs::write(layout.documents.join("stale.html"), "old").unwrap();
        std::fs::remove_file(docs.join("css/style.css")).unwrap();

        let second = DocsetConfig::new(&docs, "MyLib")
            .with_destination(&out)
            .with_entries(vec![SearchEntry::new("bar", "Method", "index.html#bar")]);
        DocsetAssembler::new(second)
            .unwrap()
            .create(&SilentProgress)
            .await
            .unwrap();

        assert!(!layout.documents.join("stale.html").exists());
        assert!(!layout.documents.join("css/style.css").exists());
        assert_eq!(snapshot(&layout.documents), snapshot(&docs));
        assert_eq!(
            indexed(&layout).await,
            [SearchEntry::new("bar", "Method", "index.html#bar")]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn self_contained_build_preserves_documentation() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let original = snapshot(&docs);

        let config = DocsetConfig::new(&docs, "MyLib").with_entries(entries());
        let assembler = DocsetAssembler::new(config).unwrap();
        assert!(assembler.is_self_contained());

        let layout = assembler.layout().clone();
        let build = assembler.create(&SilentProgress).await.unwrap();

        assert_eq!(build.bundle_path, docs.join("MyLib.docset"));
        let top: Vec<_> = std::fs::read_dir(&docs)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(top, ["MyLib.docset"]);
        assert_eq!(snapshot(&layout.documents), original);
        assert_eq!(indexed(&layout).await, entries());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn self_contained_rebuild_does_not_nest_old_bundle() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let original = snapshot(&docs);

        for _ in 0..2 {
            let config = DocsetConfig::new(&docs, "MyLib");
            DocsetAssembler::new(config)
                .unwrap()
                .create(&SilentProgress)
                .await
                .unwrap();
        }

        let layout = DocsetLayout::new(&docs, "MyLib");
        assert!(!layout.documents.join("MyLib.docset").exists());
        assert_eq!(snapshot(&layout.documents), original);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn copies_icon_when_present() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let icon = tmp.join("icon-source.png");
        std::fs::write(&icon, [137u8, 80, 78, 71, 13, 10, 26, 10]).unwrap();

        let config = DocsetConfig::new(&docs, "MyLib")
            .with_destination(tmp.join("out"))
            .with_icon(&icon);
        let assembler = DocsetAssembler::new(config).unwrap();
        let layout = assembler.layout().clone();
        let build = assembler.create(&SilentProgress).await.unwrap();

        assert!(build.icon_copied);
        assert_eq!(std::fs::read(&layout.icon).unwrap(), std::fs::read(&icon).unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn missing_icon_is_skipped() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);

        let config = DocsetConfig::new(&docs, "MyLib")
            .with_destination(tmp.join("out"))
            .with_icon(tmp.join("does-not-exist.png"));
        let assembler = DocsetAssembler::new(config).unwrap();
        let layout = assembler.layout().clone();
        let build = assembler.create(&SilentProgress).await.unwrap();

        assert!(!build.icon_copied);
        assert!(!layout.icon.exists());
        assert!(layout.info_plist.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn creates_missing_destination_root() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let out = tmp.join("a/b/c");

        let config = DocsetConfig::new(&docs, "MyLib").with_destination(&out);
        let build = DocsetAssembler::new(config)
            .unwrap()
            .create(&SilentProgress)
            .await
            .unwrap();

        assert_eq!(build.bundle_path, out.join("MyLib.docset"));
        assert!(build.bundle_path.is_dir());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn reports_progress_phases() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let config = DocsetConfig::new(&docs, "MyLib").with_destination(tmp.join("out"));

        let progress = RecordingProgress::default();
        DocsetAssembler::new(config)
            .unwrap()
            .create(&progress)
            .await
            .unwrap();

        let phases = progress.phases.lock().unwrap().clone();
        assert_eq!(phases.first().map(String::as_str), Some("Creating folder structure"));
        assert_eq!(phases.last().map(String::as_str), Some("Populating search index"));
        assert!(!phases.iter().any(|p| p == "Relocating documentation"));
        assert!(*progress.finished.lock().unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    /// Blocks the bundle by writing a file at `path` when scaffolding starts.
    struct BlockScaffold {
        path: PathBuf,
    }

    impl ProgressReporter for BlockScaffold {
        fn phase(&self, name: &str) {
            if name == "Creating folder structure" {
                std::fs::write(&self.path, "not a folder").unwrap();
            }
        }

        fn done(&self, _build: &DocsetBuild) {}
    }

    #[tokio::test]
    async fn failed_self_contained_build_keeps_relocated_copy() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let original = snapshot(&docs);

        let config = DocsetConfig::new(&docs, "MyLib").with_entries(entries());
        let assembler = DocsetAssembler::new(config).unwrap();
        let err = assembler
            .create(&BlockScaffold { path: docs.clone() })
            .await
            .unwrap_err();

        let copy = err.relocated_copy().expect("error names the relocated copy").to_path_buf();
        assert!(err.to_string().contains(&*copy.to_string_lossy()));
        assert!(copy.is_dir());
        assert_eq!(snapshot(&copy), original);

        let _ = std::fs::remove_dir_all(&copy);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn failed_build_without_relocation_is_plain_error() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let out = tmp.join("out");

        let config = DocsetConfig::new(&docs, "MyLib").with_destination(&out);
        let err = DocsetAssembler::new(config)
            .unwrap()
            .create(&BlockScaffold { path: out.clone() })
            .await
            .unwrap_err();

        assert!(err.relocated_copy().is_none());
        assert_eq!(snapshot(&docs).len(), 4);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn self_contained_build_copies_icon_from_documentation() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let png = [137u8, 80, 78, 71, 13, 10, 26, 10];
        std::fs::write(docs.join("icon.png"), png).unwrap();

        let config = DocsetConfig::new(&docs, "MyLib").with_icon(docs.join("icon.png"));
        let assembler = DocsetAssembler::new(config).unwrap();
        let layout = assembler.layout().clone();
        let build = assembler.create(&SilentProgress).await.unwrap();

        assert!(build.icon_copied);
        assert_eq!(std::fs::read(&layout.icon).unwrap(), png);
        assert_eq!(std::fs::read(layout.documents.join("icon.png")).unwrap(), png);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    // Construction checks ---------------------------------------------------

    #[test]
    fn rejects_missing_documentation() {
        let tmp = temp_dir();
        let config = DocsetConfig::new(tmp.join("missing"), "MyLib").with_destination(tmp.join("out"));

        let err = DocsetAssembler::new(config).unwrap_err();
        assert!(err.is_config());
        assert!(!tmp.join("out").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_file_as_documentation() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("index.html"), "x").unwrap();
        let config = DocsetConfig::new(tmp.join("index.html"), "MyLib");

        assert!(DocsetAssembler::new(config).unwrap_err().is_config());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_name() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);

        for name in ["", "   ", "\t\n"] {
            let config = DocsetConfig::new(&docs, name).with_destination(tmp.join("out"));
            let err = DocsetAssembler::new(config).unwrap_err();
            assert!(err.is_config(), "name {name:?} should be rejected");
        }
        assert!(!tmp.join("out").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_bad_identifier() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);

        for identifier in [" ", "a/b", "..\\x"] {
            let config = DocsetConfig::new(&docs, "MyLib").with_identifier(identifier);
            assert!(DocsetAssembler::new(config).unwrap_err().is_config());
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_destination_inside_documentation() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);
        let nested = docs.join("build/out");

        let config = DocsetConfig::new(&docs, "MyLib").with_destination(&nested);
        let err = DocsetAssembler::new(config).unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("subfolder"));
        assert!(!docs.join("build").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_nested() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);

        let config = DocsetConfig::new(&docs, "MyLib").with_destination(tmp.join("html-out"));
        let assembler = DocsetAssembler::new(config).unwrap();
        assert!(!assembler.is_self_contained());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_documentation_inside_bundle() {
        let tmp = temp_dir();
        let docs = tmp.join("MyLib.docset/Contents/Resources/Documents");
        std::fs::create_dir_all(&docs).unwrap();

        let config = DocsetConfig::new(&docs, "MyLib").with_destination(&tmp);
        assert!(DocsetAssembler::new(config).unwrap_err().is_config());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn documentation_under_destination_is_allowed() {
        let tmp = temp_dir();
        let docs = make_docs(&tmp);

        let config = DocsetConfig::new(&docs, "MyLib").with_destination(&tmp);
        let assembler = DocsetAssembler::new(config).unwrap();
        assert_eq!(assembler.destination_root(), tmp.as_path());
        assert_eq!(assembler.documentation(), docs.as_path());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn documentation_resolves_symlink_before_parent_dir() {
        let tmp = temp_dir();
        let real = tmp.join("real");
        std::fs::create_dir_all(real.join("sub")).unwrap();
        let docs = make_docs(&real);
        std::os::unix::fs::symlink(real.join("sub"), tmp.join("link")).unwrap();

        // `link/..` is `real`, not `tmp`.
        let config = DocsetConfig::new(tmp.join("link/../html"), "MyLib")
            .with_destination(tmp.join("out"));
        let assembler = DocsetAssembler::new(config).unwrap();
        assert_eq!(assembler.documentation(), docs.as_path());

        let layout = assembler.layout().clone();
        assembler.create(&SilentProgress).await.unwrap();
        assert_eq!(snapshot(&layout.documents), snapshot(&docs));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn rejects_path_missing_after_symlink_resolution() {
        let tmp = temp_dir();
        std::fs::create_dir_all(tmp.join("real/sub")).unwrap();
        make_docs(&tmp);
        std::os::unix::fs::symlink(tmp.join("real/sub"), tmp.join("link")).unwrap();

        // Lexically this is `tmp/html`, which exists; on disk it is `real/html`.
        let config = DocsetConfig::new(tmp.join("link/../html"), "MyLib");
        assert!(DocsetAssembler::new(config).unwrap_err().is_config());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
