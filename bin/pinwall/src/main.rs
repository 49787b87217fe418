//! # Pinwall Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use configs::Settings;
use pw_api::middleware::{cors_policy, standard_middleware};
use pw_api::AppState;

#[cfg(feature = "db-sqlite")]
use pw_db_sqlite::SqliteRepo;

#[cfg(feature = "auth-jwt")]
use pw_auth_jwt::JwtAuthProvider;

#[cfg(not(all(feature = "db-sqlite", feature = "auth-jwt")))]
compile_error!("pinwall needs a database plugin and an auth plugin; enable `db-sqlite` and `auth-jwt`");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Before the logger, so RUST_LOG may come from .env
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::load().context("failed to load settings")?;

    // 1. Initialize Database Implementation
    let repo = SqliteRepo::connect(&settings.database.url, settings.database.max_connections)
        .await
        .with_context(|| format!("failed to open database at {}", settings.database.url))?;

    // 2. Initialize Auth Implementation
    let auth = JwtAuthProvider::new(
        &settings.auth.jwt_secret,
        settings.auth.access_ttl(),
        settings.auth.refresh_ttl(),
    );

    // 3. Wrap in AppState; one pool serves all three stores
    let state = web::Data::new(AppState {
        users: Box::new(repo.clone()),
        posts: Box::new(repo.clone()),
        comments: Box::new(repo),
        auth: Box::new(auth),
    });

    let (host, port) = settings.bind_address();
    log::info!("Pinwall starting on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(cors_policy())
            .wrap(standard_middleware())
            .configure(pw_api::app_config(state.clone()))
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
