pub mod errors;
pub mod sqlite;
pub mod tables;

pub use errors::{StoreError, StoreResult};
pub use sqlite::Database;
