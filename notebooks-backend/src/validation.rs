//! Field constraints checked before anything reaches the database.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 100;
pub const CONTENT_MAX_CHARS: usize = 10_000;
pub const USER_NAME_MIN_CHARS: usize = 3;
pub const USER_NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 100;

/// Latin and Cyrillic letters, digits, whitespace and `.-_`
static TITLE_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Zа-яА-Я0-9\s._\-]+$").expect("title charset regex is valid")
});

static USER_NAME_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("user name regex is valid"));

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

/// A violated field constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Trim and check a notebook title, returning the value to persist
pub fn notebook_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::new("title", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::new(
            "title",
            format!("Title must be between 1 and {} characters", TITLE_MAX_CHARS),
        ));
    }
    if !TITLE_CHARSET.is_match(title) {
        return Err(ValidationError::new(
            "title",
            "Title may only contain letters, digits, spaces and the characters .-_",
        ));
    }
    Ok(title.to_string())
}

/// Check note content. The content is stored exactly as sent.
pub fn note_content(raw: &str) -> Result<&str, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new("content", "Note content is required"));
    }
    if raw.chars().count() > CONTENT_MAX_CHARS {
        return Err(ValidationError::new(
            "content",
            format!("Note content cannot exceed {} characters", CONTENT_MAX_CHARS),
        ));
    }
    Ok(raw)
}

pub fn notebook_id(id: i64) -> Result<i64, ValidationError> {
    if id < 1 {
        return Err(ValidationError::new(
            "notebookId",
            "Notebook id must be a positive number",
        ));
    }
    Ok(id)
}

/// User name chosen at registration
pub fn user_name(raw: &str) -> Result<&str, ValidationError> {
    let name = required("userName", raw)?;
    let len = name.chars().count();
    if !(USER_NAME_MIN_CHARS..=USER_NAME_MAX_CHARS).contains(&len) {
        return Err(ValidationError::new(
            "userName",
            format!(
                "User name must be between {} and {} characters",
                USER_NAME_MIN_CHARS, USER_NAME_MAX_CHARS
            ),
        ));
    }
    if !USER_NAME_CHARSET.is_match(name) {
        return Err(ValidationError::new(
            "userName",
            "User name may only contain letters, digits and underscores",
        ));
    }
    Ok(name)
}

/// Optional email; blank counts as absent
pub fn email(raw: Option<&str>) -> Result<Option<&str>, ValidationError> {
    let Some(email) = raw.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Err(ValidationError::new(
            "email",
            format!("Email cannot exceed {} characters", EMAIL_MAX_CHARS),
        ));
    }
    if !EMAIL_SHAPE.is_match(email) {
        return Err(ValidationError::new("email", "Invalid email format"));
    }
    Ok(Some(email))
}

/// Login only requires the fields to be present
pub fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, format!("{} is required", field)));
    }
    Ok(value)
}
