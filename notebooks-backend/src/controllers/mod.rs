pub mod auth;
pub mod errors;
pub mod health;
pub mod notebooks;
pub mod notes;

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest};

use errors::ApiError;

/// All HTTP routes plus the JSON body settings they share
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));

    health::config_routes(cfg);
    auth::config(cfg);
    notebooks::config(cfg);
    notes::config(cfg);
}

/// Malformed bodies get the same JSON error shape as every other failure
fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body for {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
}
