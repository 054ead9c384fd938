//! # Crewfinder Binary
//!
//! The entry point that assembles the application based on compile-time
//! features: a storage plugin, an auth plugin, and the actix-web surface.

use actix_web::{web, App, HttpServer};
use cf_api::{configure_routes, middleware, AppState};
use std::sync::Arc;

#[cfg(feature = "db-sqlite")]
use cf_db_sqlite::SqliteRepo;

#[cfg(feature = "auth-simple")]
use cf_auth_simple::SimpleAuthProvider;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url =
        std::env::var("CF_DATABASE_URL").unwrap_or_else(|_| "sqlite:crewfinder.db".to_string());
    let bind_addr =
        std::env::var("CF_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // 1. Storage implementation
    #[cfg(feature = "db-sqlite")]
    let repo = Arc::new(
        SqliteRepo::new(&database_url)
            .await
            .expect("failed to init SQLite"),
    );

    // 2. Auth implementation
    #[cfg(feature = "auth-simple")]
    let auth = Arc::new(SimpleAuthProvider::new());

    // 3. Wrap in AppState (dynamic dispatch at the ports)
    let state = web::Data::new(AppState::new(repo.clone(), repo.clone(), repo, auth));

    log::info!("crewfinder starting on http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
