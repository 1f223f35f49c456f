//! Docset assembly for docsetgen.
//!
//! This crate turns an HTML documentation tree plus a list of search entries
//! into a `<identifier>.docset` bundle: copied documents, `Info.plist`,
//! optional icon, and the `docSet.dsidx` search index.

pub mod assembler;
pub mod fsutil;
pub mod layout;
pub mod plist;
pub mod validate;

pub use assembler::{DocsetAssembler, DocsetBuild, ProgressReporter, SilentProgress};
pub use layout::DocsetLayout;
pub use validate::validate_docset;
