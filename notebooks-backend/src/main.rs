use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;

mod auth;
mod config;
mod controllers;
mod db;
mod models;
mod validation;

#[cfg(test)]
mod test_support;

use auth::{IdentityProvider, SqliteIdentityProvider, TokenService};
use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    /// Credential checks and account creation
    pub identity: Arc<dyn IdentityProvider>,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Notebooks backend v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let port = config.port;

    if let Some(dir) = config.database_dir() {
        std::fs::create_dir_all(dir)?;
    }

    log::info!("Opening database at {}", config.database_url);
    let db = Database::new(&config.database_url, config.db_pool_size).map_err(|e| {
        log::error!("[DB] Failed to open database: {}", e);
        io::Error::other(e.to_string())
    })?;
    let db = Arc::new(db);

    let tokens = TokenService::new(&config.jwt).map_err(|e| {
        log::error!("[AUTH] Failed to build token service: {}", e);
        io::Error::other(e.to_string())
    })?;

    let state = web::Data::new(AppState {
        identity: Arc::new(SqliteIdentityProvider::new(Arc::clone(&db))),
        db,
    });
    let tokens = web::Data::new(tokens);

    log::info!("Starting server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(tokens.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
