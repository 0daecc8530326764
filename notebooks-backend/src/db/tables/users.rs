//! User account operations backing the identity collaborator

use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::sqlite::{format_timestamp, parse_timestamp};
use crate::db::{Database, StoreError, StoreResult};
use crate::models::User;
use crate::validation::ValidationError;

impl Database {
    /// Insert a new account. A taken user name is a rejection, not a transient failure.
    pub fn create_user(
        &self,
        user_name: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> StoreResult<User> {
        let conn = self.conn()?;
        let id = Uuid::new_v4().to_string();
        let created_at = format_timestamp(&Utc::now());

        let inserted = conn.query_row(
            "INSERT INTO users (id, user_name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_name, email, password_hash, created_at, last_login_at",
            params![id, user_name, email, password_hash, created_at],
            Self::row_to_user,
        );

        match inserted {
            Ok(user) => Ok(user),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Rejected(ValidationError::new(
                    "userName",
                    "User name is already taken",
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_user_by_name(&self, user_name: &str) -> StoreResult<Option<User>> {
        let conn = self.conn()?;

        let user = conn
            .query_row(
                "SELECT id, user_name, email, password_hash, created_at, last_login_at
                 FROM users WHERE user_name = ?1",
                [user_name],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Stamp a successful login
    pub fn record_login(&self, user_id: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
            params![format_timestamp(&Utc::now()), user_id],
        )?;
        Ok(())
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        let created_at: String = row.get(4)?;
        let last_login_at: Option<String> = row.get(5)?;

        Ok(User {
            id: row.get(0)?,
            user_name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: parse_timestamp(4, &created_at)?,
            last_login_at: last_login_at
                .map(|raw| parse_timestamp(5, &raw))
                .transpose()?,
        })
    }
}
