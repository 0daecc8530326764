//! Notes REST API. Every note is reached through a notebook the caller owns.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use notebooks_types::{CreateNoteRequest, NoteDto, UpdateNoteRequest};

use super::errors::ApiError;
use crate::auth::AuthContext;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::post().to(create_note))
            .route("/notebook/{notebook_id}", web::get().to(list_notes_by_notebook))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}", web::delete().to(delete_note)),
    );
}

/// Empty list when the notebook is missing or belongs to someone else
async fn list_notes_by_notebook(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let notebook_id = path.into_inner();
    let notes = state.db.list_notes_by_notebook(notebook_id, auth.user_id())?;

    let body: Vec<NoteDto> = notes.into_iter().map(NoteDto::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_note(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let note = state
        .db
        .get_note(id, auth.user_id())
        .map_err(|e| ApiError::from_store(e, "Note", id))?;

    Ok(HttpResponse::Ok().json(NoteDto::from(note)))
}

async fn create_note(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let note = state
        .db
        .create_note(auth.user_id(), body.notebook_id, &body.content)?;
    log::info!(
        "[NOTES] Created note {} in notebook {}",
        note.id,
        note.notebook_id
    );

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/notes/{}", note.id)))
        .json(NoteDto::from(note)))
}

async fn update_note(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state
        .db
        .update_note(id, auth.user_id(), &body.content)
        .map_err(|e| ApiError::from_store(e, "Note", id))?;
    log::info!("[NOTES] Updated note {}", id);

    Ok(HttpResponse::NoContent().finish())
}

async fn delete_note(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !state.db.delete_note(id, auth.user_id())? {
        return Err(ApiError::NotFound(format!("Note with id {} not found", id)));
    }
    log::info!("[NOTES] Deleted note {}", id);

    Ok(HttpResponse::NoContent().finish())
}
