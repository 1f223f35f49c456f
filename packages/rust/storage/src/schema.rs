//! SQL for the docset search index.
//!
//! Documentation browsers read a single `searchIndex` table. The table name
//! is fixed and carries no timestamp or versioning columns.

/// Table name expected by documentation browsers.
pub(crate) const TABLE: &str = "searchIndex";

/// Drops any existing index table and recreates it empty.
pub(crate) const RESET_SQL: &str = r#"
DROP TABLE IF EXISTS searchIndex;

CREATE TABLE searchIndex (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    type TEXT,
    path TEXT
);
"#;

pub(crate) const INSERT_SQL: &str = "INSERT INTO searchIndex (name, type, path) VALUES (?1, ?2, ?3)";

pub(crate) const SELECT_ALL_SQL: &str = "SELECT id, name, type, path FROM searchIndex ORDER BY id";

pub(crate) const COUNT_SQL: &str = "SELECT COUNT(*) FROM searchIndex";

pub(crate) const TABLE_EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";
