//! libSQL storage for the docset search index (`docSet.dsidx`).
//!
//! [`SearchIndex::create`] resets the schema and hands back the handle that
//! [`SearchIndex::insert_entries`] writes through, so there is no window in
//! which rows can be inserted before the table exists.

mod schema;

use std::path::{Path, PathBuf};

use docsetgen_shared::{DocsetError, Result, SearchEntry};
use libsql::{Connection, Database, params};

/// A row read back from the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedEntry {
    pub id: i64,
    pub entry: SearchEntry,
}

/// Handle to an open search index database.
pub struct SearchIndex {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
    path: PathBuf,
}

impl SearchIndex {
    /// Create (or open) the database at `path` and reset the `searchIndex`
    /// table. Any rows from a previous build are dropped.
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
        }

        let index = Self::connect(path).await?;
        index
            .conn
            .execute_batch(schema::RESET_SQL)
            .await
            .map_err(|e| DocsetError::Storage(format!("schema reset failed: {e}")))?;

        tracing::debug!(path = %path.display(), table = schema::TABLE, "search index schema created");
        Ok(index)
    }

    /// Open an existing database without touching its schema.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DocsetError::Storage(format!(
                "no search index at {}",
                path.display()
            )));
        }
        Self::connect(path).await
    }

    async fn connect(path: &Path) -> Result<Self> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert all entries in order inside a single transaction.
    /// Returns the number of rows written.
    pub async fn insert_entries(&self, entries: &[SearchEntry]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        for entry in entries {
            tx.execute(
                schema::INSERT_SQL,
                params![entry.name.as_str(), entry.kind.as_str(), entry.path.as_str()],
            )
            .await
            .map_err(|e| {
                DocsetError::Storage(format!("insert of '{}' failed: {e}", entry.name))
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        tracing::debug!(count = entries.len(), "search entries inserted");
        Ok(entries.len())
    }

    /// Whether the `searchIndex` table exists.
    pub async fn has_table(&self) -> Result<bool> {
        let count = self.scalar(schema::TABLE_EXISTS_SQL, params![schema::TABLE]).await?;
        Ok(count > 0)
    }

    /// Number of rows in the index.
    pub async fn count(&self) -> Result<u64> {
        let count = self.scalar(schema::COUNT_SQL, params![]).await?;
        u64::try_from(count).map_err(|e| DocsetError::Storage(e.to_string()))
    }

    /// All rows in insertion order.
    pub async fn entries(&self) -> Result<Vec<IndexedEntry>> {
        let mut rows = self
            .conn
            .query(schema::SELECT_ALL_SQL, params![])
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?
        {
            results.push(row_to_entry(&row)?);
        }
        Ok(results)
    }

    async fn scalar(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<i64> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| DocsetError::Storage(e.to_string()))?;

        match rows.next().await {
            Ok(Some(row)) => row
                .get::<i64>(0)
                .map_err(|e| DocsetError::Storage(e.to_string())),
            Ok(None) => Ok(0),
            Err(e) => Err(DocsetError::Storage(e.to_string())),
        }
    }
}

fn row_to_entry(row: &libsql::Row) -> Result<IndexedEntry> {
    let get = |idx: i32| {
        row.get::<String>(idx)
            .map_err(|e| DocsetError::Storage(e.to_string()))
    };

    Ok(IndexedEntry {
        id: row
            .get::<i64>(0)
            .map_err(|e| DocsetError::Storage(e.to_string()))?,
        entry: SearchEntry {
            name: get(1)?,
            kind: get(2)?,
            path: get(3)?,
        },
    })
}
