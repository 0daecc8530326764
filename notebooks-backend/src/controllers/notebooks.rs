//! Notebook REST API, scoped to the authenticated caller

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use notebooks_types::{
    CreateNotebookRequest, NotebookDto, NotebookWithNotesDto, UpdateNotebookRequest,
};

use super::errors::ApiError;
use crate::auth::AuthContext;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notebooks")
            .route("", web::get().to(list_notebooks))
            .route("", web::post().to(create_notebook))
            .route("/{id}", web::get().to(get_notebook))
            .route("/{id}", web::put().to(update_notebook))
            .route("/{id}", web::delete().to(delete_notebook)),
    );
}

async fn list_notebooks(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    let notebooks = state.db.list_notebooks(auth.user_id())?;
    log::debug!(
        "[NOTEBOOKS] Listed {} notebooks for user {}",
        notebooks.len(),
        auth.user_id()
    );

    let body: Vec<NotebookDto> = notebooks.into_iter().map(NotebookDto::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_notebook(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let detail = state
        .db
        .get_notebook(id, auth.user_id())
        .map_err(|e| ApiError::from_store(e, "Notebook", id))?;

    Ok(HttpResponse::Ok().json(NotebookWithNotesDto::from(detail)))
}

async fn create_notebook(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CreateNotebookRequest>,
) -> Result<HttpResponse, ApiError> {
    let notebook = state.db.create_notebook(auth.user_id(), &body.title)?;
    log::info!(
        "[NOTEBOOKS] Created notebook {} for user {}",
        notebook.id,
        auth.user_id()
    );

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/notebooks/{}", notebook.id)))
        .json(NotebookDto::from(notebook)))
}

async fn update_notebook(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
    body: web::Json<UpdateNotebookRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state
        .db
        .update_notebook(id, auth.user_id(), &body.title)
        .map_err(|e| ApiError::from_store(e, "Notebook", id))?;
    log::info!("[NOTEBOOKS] Renamed notebook {}", id);

    Ok(HttpResponse::NoContent().finish())
}

async fn delete_notebook(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !state.db.delete_notebook(id, auth.user_id())? {
        return Err(ApiError::NotFound(format!("Notebook with id {} not found", id)));
    }
    log::info!("[NOTEBOOKS] Deleted notebook {} and its notes", id);

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::{header, StatusCode};
    use actix_web::test;
    use notebooks_types::{ErrorResponse, NotebookDto, NotebookWithNotesDto};
    use serde_json::json;

    use crate::test_support::{bearer, seed_user, test_app, test_db};

    #[actix_web::test]
    async fn test_create_list_get_rename_delete() {
        let (_dir, db) = test_db();
        let alice = bearer(&seed_user(&db, "alice"));
        let app = test_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .set_json(json!({ "title": "  Trip Plans  " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let location = resp.headers().get(header::LOCATION).cloned();
        let created: NotebookDto = test::read_body_json(resp).await;
        assert_eq!(created.title, "Trip Plans");
        assert_eq!(created.notes_count, 0);
        assert_eq!(
            location.unwrap().to_str().unwrap(),
            format!("/api/notebooks/{}", created.id)
        );

        let req = test::TestRequest::get()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .to_request();
        let listed: Vec<NotebookDto> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);

        let req = test::TestRequest::put()
            .uri(&format!("/api/notebooks/{}", created.id))
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .set_json(json!({ "title": "Vacation" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/notebooks/{}", created.id))
            .insert_header((header::AUTHORIZATION, alice.clone()))
            .to_request();
        let detail: NotebookWithNotesDto = test::call_and_read_body_json(&app, req).await;
        assert_eq!(detail.title, "Vacation");
        assert_eq!(detail.created_at, created.created_at);
        assert!(detail.notes.is_empty());

        let delete = || {
            test::TestRequest::delete()
                .uri(&format!("/api/notebooks/{}", created.id))
                .insert_header((header::AUTHORIZATION, alice.clone()))
                .to_request()
        };
        assert_eq!(test::call_service(&app, delete()).await.status(), StatusCode::NO_CONTENT);
        assert_eq!(test::call_service(&app, delete()).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_requests_without_token_are_unauthorized() {
        let (_dir, db) = test_db();
        let app = test_app!(db);

        let req = test::TestRequest::get().uri("/api/notebooks").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .set_json(json!({ "title": "Sneaky" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_lowercase_bearer_scheme_is_accepted() {
        let (_dir, db) = test_db();
        let alice = bearer(&seed_user(&db, "alice")).replacen("Bearer", "bearer", 1);
        let app = test_app!(db);

        let req = test::TestRequest::get()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, alice))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_token_for_deleted_user_is_unauthorized() {
        let (_dir, db) = test_db();
        let app = test_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, bearer("user-that-was-removed")))
            .set_json(json!({ "title": "Orphan" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_foreign_notebook_is_not_found() {
        let (_dir, db) = test_db();
        let alice_id = seed_user(&db, "alice");
        let bob = bearer(&seed_user(&db, "bob"));
        let notebook = db.create_notebook(&alice_id, "Private").unwrap();
        let app = test_app!(db);

        let req = test::TestRequest::get()
            .uri(&format!("/api/notebooks/{}", notebook.id))
            .insert_header((header::AUTHORIZATION, bob.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let foreign: ErrorResponse = test::read_body_json(resp).await;

        let req = test::TestRequest::get()
            .uri("/api/notebooks/999999")
            .insert_header((header::AUTHORIZATION, bob.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let missing: ErrorResponse = test::read_body_json(resp).await;
        assert!(foreign.error.contains("not found"));
        assert!(missing.error.contains("not found"));

        let req = test::TestRequest::put()
            .uri(&format!("/api/notebooks/{}", notebook.id))
            .insert_header((header::AUTHORIZATION, bob.clone()))
            .set_json(json!({ "title": "Defaced" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, bob))
            .to_request();
        let listed: Vec<NotebookDto> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.is_empty());
    }

    #[actix_web::test]
    async fn test_invalid_titles_are_rejected_with_field() {
        let (_dir, db) = test_db();
        let alice = bearer(&seed_user(&db, "alice"));
        let app = test_app!(db);

        let too_long = "a".repeat(101);
        for title in ["", "   ", "Bad<title>", too_long.as_str()] {
            let req = test::TestRequest::post()
                .uri("/api/notebooks")
                .insert_header((header::AUTHORIZATION, alice.clone()))
                .set_json(json!({ "title": title }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "title {:?}", title);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body.field.as_deref(), Some("title"));
        }

        let req = test::TestRequest::get()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, alice))
            .to_request();
        let listed: Vec<NotebookDto> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let (_dir, db) = test_db();
        let alice = bearer(&seed_user(&db, "alice"));
        let app = test_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/notebooks")
            .insert_header((header::AUTHORIZATION, alice))
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.starts_with("Invalid request body"));
    }
}
