//! Shared fixtures for unit and controller tests

use chrono::Utc;
use std::sync::Arc;
use std::time::SystemTime;
use tempfile::TempDir;

use crate::auth::{SqliteIdentityProvider, TokenService};
use crate::config::JwtConfig;
use crate::db::Database;
use crate::models::User;
use crate::AppState;

/// Fresh database file in a temp dir; keep the dir alive for the test's duration
pub fn test_db() -> (TempDir, Database) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("test.db");
    let db = Database::new(path.to_str().expect("temp path is not UTF-8"), 4)
        .expect("Failed to open test database");
    (dir, db)
}

/// Insert a user row directly and return its id
pub fn seed_user(db: &Database, user_name: &str) -> String {
    db.create_user(user_name, None, "$argon2id$v=19$m=19456,t=2,p=1$c2VlZA$c2VlZA")
        .expect("Failed to seed user")
        .id
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        key: b"test-signing-key-with-at-least-32-bytes".to_vec(),
        issuer: "notebooks-backend-test".to_string(),
        audience: "notebooks-tests".to_string(),
        expire_minutes: 60,
    }
}

pub fn test_user(id: &str, user_name: &str) -> User {
    User {
        id: id.to_string(),
        user_name: user_name.to_string(),
        email: None,
        password_hash: String::new(),
        created_at: Utc::now(),
        last_login_at: None,
    }
}

pub fn test_state(db: Database) -> AppState {
    let db = Arc::new(db);
    AppState {
        identity: Arc::new(SqliteIdentityProvider::new(Arc::clone(&db))),
        db,
    }
}

pub fn test_tokens() -> TokenService {
    TokenService::new(&test_jwt_config()).expect("Failed to build token service")
}

/// `Authorization` header value for a seeded user
pub fn bearer(user_id: &str) -> String {
    let issued = test_tokens()
        .issue(&test_user(user_id, "tester"), SystemTime::now())
        .expect("Failed to issue token");
    format!("Bearer {}", issued.token)
}

/// Full application service over a database, wired the same way as `main`
macro_rules! test_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($crate::test_support::test_state($db)))
                .app_data(actix_web::web::Data::new($crate::test_support::test_tokens()))
                .configure($crate::controllers::configure),
        )
        .await
    };
}

pub(crate) use test_app;
