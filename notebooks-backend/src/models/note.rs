use chrono::{DateTime, Utc};
use notebooks_types::NoteDto;

/// A note row. Ownership is never stored here; it follows from the parent notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub content: String,
    pub notebook_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        NoteDto {
            id: note.id,
            content: note.content,
            created_at: note.created_at,
            notebook_id: note.notebook_id,
        }
    }
}
