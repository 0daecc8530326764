//! Ownership-scoped note operations
//!
//! Notes carry no owner column. Every statement joins through the parent notebook
//! and filters on its `owner_id`.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::sqlite::{format_timestamp, parse_timestamp};
use crate::db::{Database, StoreError, StoreResult};
use crate::models::Note;
use crate::validation::{self, ValidationError};

impl Database {
    /// Notes of one notebook; empty when the notebook is absent or not owned
    pub fn list_notes_by_notebook(&self, notebook_id: i64, owner_id: &str) -> StoreResult<Vec<Note>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT n.id, n.content, n.notebook_id, n.created_at
             FROM notes n
             JOIN notebooks nb ON nb.id = n.notebook_id
             WHERE n.notebook_id = ?1 AND nb.owner_id = ?2
             ORDER BY n.id",
        )?;

        let notes = stmt
            .query_map(params![notebook_id, owner_id], Self::row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    pub fn get_note(&self, id: i64, owner_id: &str) -> StoreResult<Note> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT n.id, n.content, n.notebook_id, n.created_at
             FROM notes n
             JOIN notebooks nb ON nb.id = n.notebook_id
             WHERE n.id = ?1 AND nb.owner_id = ?2",
            params![id, owner_id],
            Self::row_to_note,
        )
        .optional()?
        .ok_or(StoreError::NotFound)
    }

    /// Add a note to a notebook the caller owns.
    ///
    /// The ownership check and the insert are one statement, so a concurrent
    /// notebook delete cannot leave the note behind. An unknown or foreign
    /// notebook is a rejection of the `notebookId` field.
    pub fn create_note(&self, owner_id: &str, notebook_id: i64, content: &str) -> StoreResult<Note> {
        let notebook_id = validation::notebook_id(notebook_id)?;
        let content = validation::note_content(content)?;
        let conn = self.conn()?;

        conn.query_row(
            "INSERT INTO notes (content, notebook_id, created_at)
             SELECT ?1, nb.id, ?2 FROM notebooks nb
             WHERE nb.id = ?3 AND nb.owner_id = ?4
             RETURNING id, content, notebook_id, created_at",
            params![content, format_timestamp(&Utc::now()), notebook_id, owner_id],
            Self::row_to_note,
        )
        .optional()?
        .ok_or_else(|| {
            StoreError::Rejected(ValidationError::new(
                "notebookId",
                "Notebook not found or access denied",
            ))
        })
    }

    /// Replace a note's content. The parent notebook and creation time never change.
    pub fn update_note(&self, id: i64, owner_id: &str, content: &str) -> StoreResult<Note> {
        let content = validation::note_content(content)?;
        let conn = self.conn()?;

        conn.query_row(
            "UPDATE notes SET content = ?1
             WHERE id = ?2
               AND notebook_id IN (SELECT id FROM notebooks WHERE owner_id = ?3)
             RETURNING id, content, notebook_id, created_at",
            params![content, id, owner_id],
            Self::row_to_note,
        )
        .optional()?
        .ok_or(StoreError::NotFound)
    }

    /// Returns false when the note is absent or its notebook is not owned
    pub fn delete_note(&self, id: i64, owner_id: &str) -> StoreResult<bool> {
        let conn = self.conn()?;

        let rows_affected = conn.execute(
            "DELETE FROM notes
             WHERE id = ?1
               AND notebook_id IN (SELECT id FROM notebooks WHERE owner_id = ?2)",
            params![id, owner_id],
        )?;

        Ok(rows_affected > 0)
    }

    pub(crate) fn row_to_note(row: &Row<'_>) -> rusqlite::Result<Note> {
        let created_at: String = row.get(3)?;
        Ok(Note {
            id: row.get(0)?,
            content: row.get(1)?,
            notebook_id: row.get(2)?,
            created_at: parse_timestamp(3, &created_at)?,
        })
    }
}
