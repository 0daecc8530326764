mod note;
mod notebook;
mod user;

pub use note::Note;
pub use notebook::{Notebook, NotebookDetail, NotebookSummary};
pub use user::User;
