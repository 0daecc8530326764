use chrono::{DateTime, Utc};

/// An account known to the identity collaborator
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub email: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
