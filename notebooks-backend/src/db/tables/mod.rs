//! Table operations, one `impl Database` block per table.

mod notebooks;
mod notes;
mod users;
