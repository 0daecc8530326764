//! Ownership-scoped notebook operations
//!
//! Every query filters on `owner_id`, so a notebook that belongs to another user
//! behaves exactly like one that does not exist.

use chrono::Utc;
use rusqlite::{ffi, params, OptionalExtension, Row};

use crate::db::sqlite::{format_timestamp, parse_timestamp};
use crate::db::{Database, StoreError, StoreResult};
use crate::models::{Notebook, NotebookDetail, NotebookSummary};
use crate::validation;

impl Database {
    /// All notebooks owned by `owner_id`, each with its note count. Unpaginated.
    pub fn list_notebooks(&self, owner_id: &str) -> StoreResult<Vec<NotebookSummary>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT nb.id, nb.title, nb.owner_id, nb.created_at,
                    (SELECT COUNT(*) FROM notes n WHERE n.notebook_id = nb.id) AS notes_count
             FROM notebooks nb
             WHERE nb.owner_id = ?1
             ORDER BY nb.id",
        )?;

        let notebooks = stmt
            .query_map([owner_id], |row| {
                Ok(NotebookSummary {
                    notebook: Self::row_to_notebook(row)?,
                    notes_count: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notebooks)
    }

    /// A notebook and its notes. The two reads are separate statements.
    pub fn get_notebook(&self, id: i64, owner_id: &str) -> StoreResult<NotebookDetail> {
        let conn = self.conn()?;

        let notebook = conn
            .query_row(
                "SELECT id, title, owner_id, created_at
                 FROM notebooks WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
                Self::row_to_notebook,
            )
            .optional()?
            .ok_or(StoreError::NotFound)?;

        let mut stmt = conn.prepare(
            "SELECT id, content, notebook_id, created_at
             FROM notes WHERE notebook_id = ?1
             ORDER BY id",
        )?;
        let notes = stmt
            .query_map([notebook.id], Self::row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(NotebookDetail { notebook, notes })
    }

    /// Ownership comes from the authenticated caller only
    pub fn create_notebook(&self, owner_id: &str, title: &str) -> StoreResult<Notebook> {
        let title = validation::notebook_title(title)?;
        let conn = self.conn()?;

        let inserted = conn.query_row(
            "INSERT INTO notebooks (title, owner_id, created_at)
             VALUES (?1, ?2, ?3)
             RETURNING id, title, owner_id, created_at",
            params![title, owner_id, format_timestamp(&Utc::now())],
            Self::row_to_notebook,
        );

        match inserted {
            Ok(notebook) => Ok(notebook),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                log::warn!("[NOTEBOOKS] Create by unknown user {}", owner_id);
                Err(StoreError::UnknownOwner)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a notebook. Owner and creation time never change.
    pub fn update_notebook(&self, id: i64, owner_id: &str, title: &str) -> StoreResult<Notebook> {
        let title = validation::notebook_title(title)?;
        let conn = self.conn()?;

        conn.query_row(
            "UPDATE notebooks SET title = ?1
             WHERE id = ?2 AND owner_id = ?3
             RETURNING id, title, owner_id, created_at",
            params![title, id, owner_id],
            Self::row_to_notebook,
        )
        .optional()?
        .ok_or(StoreError::NotFound)
    }

    /// Delete a notebook and all of its notes in one transaction.
    /// Returns false when the notebook is absent or not owned.
    pub fn delete_notebook(&self, id: i64, owner_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let owned = tx
            .query_row(
                "SELECT 1 FROM notebooks WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !owned {
            return Ok(false);
        }

        let notes_removed = tx.execute("DELETE FROM notes WHERE notebook_id = ?1", [id])?;
        tx.execute(
            "DELETE FROM notebooks WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        )?;
        tx.commit()?;

        log::debug!("[NOTEBOOKS] Removed notebook {} with {} notes", id, notes_removed);
        Ok(true)
    }

    pub(crate) fn row_to_notebook(row: &Row<'_>) -> rusqlite::Result<Notebook> {
        let created_at: String = row.get(3)?;
        Ok(Notebook {
            id: row.get(0)?,
            title: row.get(1)?,
            owner_id: row.get(2)?,
            created_at: parse_timestamp(3, &created_at)?,
        })
    }
}
