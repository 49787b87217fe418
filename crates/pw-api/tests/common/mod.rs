#![allow(dead_code)]

use actix_web::http::header;
use actix_web::web;
use chrono::Duration;
use pw_api::AppState;
use pw_auth_jwt::JwtAuthProvider;
use pw_core::models::{NewUser, User};
use pw_db_sqlite::SqliteRepo;
use secrecy::SecretString;

pub const PASSWORD: &str = "correct horse";

/// Fresh in-memory store wired the way the binary wires it.
pub async fn state() -> web::Data<AppState> {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let auth = JwtAuthProvider::new(
        &SecretString::from("test-secret".to_string()),
        Duration::minutes(5),
        Duration::days(1),
    );

    web::Data::new(AppState {
        users: Box::new(repo.clone()),
        posts: Box::new(repo.clone()),
        comments: Box::new(repo),
        auth: Box::new(auth),
    })
}

/// Registers `name` with [`PASSWORD`] and returns the user plus an access token.
pub async fn user(state: &AppState, name: &str) -> (User, String) {
    let hash = state.auth.hash_password(PASSWORD).await.unwrap();
    let user = state
        .users
        .create_user(NewUser::new(name.to_string(), hash))
        .await
        .unwrap();
    let tokens = state.auth.issue_tokens(&user).unwrap();
    (user, tokens.access)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
