use chrono::{DateTime, Utc};
use notebooks_types::{NoteDto, NotebookDto, NotebookWithNotesDto};

use super::Note;

/// A notebook row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub id: i64,
    pub title: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Notebook annotated with the number of notes it holds
#[derive(Debug, Clone)]
pub struct NotebookSummary {
    pub notebook: Notebook,
    pub notes_count: i64,
}

/// Notebook together with its notes
#[derive(Debug, Clone)]
pub struct NotebookDetail {
    pub notebook: Notebook,
    pub notes: Vec<Note>,
}

impl From<NotebookSummary> for NotebookDto {
    fn from(summary: NotebookSummary) -> Self {
        let NotebookSummary { notebook, notes_count } = summary;
        NotebookDto {
            id: notebook.id,
            title: notebook.title,
            owner_id: notebook.owner_id,
            created_at: notebook.created_at,
            notes_count,
        }
    }
}

/// A freshly created notebook has no notes yet
impl From<Notebook> for NotebookDto {
    fn from(notebook: Notebook) -> Self {
        NotebookSummary {
            notebook,
            notes_count: 0,
        }
        .into()
    }
}

impl From<NotebookDetail> for NotebookWithNotesDto {
    fn from(detail: NotebookDetail) -> Self {
        let NotebookDetail { notebook, notes } = detail;
        NotebookWithNotesDto {
            id: notebook.id,
            title: notebook.title,
            owner_id: notebook.owner_id,
            created_at: notebook.created_at,
            notes_count: notes.len() as i64,
            notes: notes.into_iter().map(NoteDto::from).collect(),
        }
    }
}
