//! Account and token endpoints.

use actix_web::{web, HttpResponse};
use pw_core::error::AppError;
use pw_core::models::NewUser;
use pw_core::permissions;
use pw_core::validation;
use serde::Deserialize;
use serde_json::json;

use super::{parse_body, required, AppState};
use crate::error::ApiResult;
use crate::identity::Identity;

/// Well-formed argon2id hash with default parameters. Unknown usernames are
/// checked against it so they cost as much as a wrong password.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$mKiSziClCuXwQxWfzSImgA$n3lJO+FDTStbqNRu3dt8OcBX7HYPLYrcmkhJsw+2T2M";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /users/login/
///
/// The token endpoints do not read the `Authorization` header at all.
pub async fn login(data: web::Data<AppState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let input: Credentials = parse_body(&body)?;
    let username = required("username", input.username)?;
    let password = required("password", input.password)?;

    let user = match data.users.get_user_by_username(&username).await? {
        Some(user) if data.auth.verify_password(&password, &user.password_hash).await => Some(user),
        Some(_) => None,
        None => {
            data.auth.verify_password(&password, DUMMY_PASSWORD_HASH).await;
            None
        }
    };
    let Some(user) = user else {
        log::warn!("failed login attempt for {username:?}");
        return Err(AppError::Unauthorized(
            "no active account found with the given credentials".to_string(),
        )
        .into());
    };

    let tokens = data.auth.issue_tokens(&user)?;
    log::info!("user {} logged in", user.uuid);
    Ok(HttpResponse::Ok().json(tokens))
}

/// POST /users/token/refresh/
pub async fn refresh_token(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input: RefreshRequest = parse_body(&body)?;
    let refresh = required("refresh", input.refresh)?;

    let access = data.auth.refresh(&refresh)?;
    Ok(HttpResponse::Ok().json(json!({ "access": access })))
}

/// POST /users/token/verify/
pub async fn verify_token(data: web::Data<AppState>, body: web::Bytes) -> ApiResult<HttpResponse> {
    let input: VerifyRequest = parse_body(&body)?;
    let token = required("token", input.token)?;

    data.auth.verify(&token)?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// GET /users/me/
pub async fn current_user(identity: Identity) -> ApiResult<HttpResponse> {
    let caller = permissions::authenticated(identity.user())?;
    Ok(HttpResponse::Ok().json(caller))
}

/// GET /users/{username}/
pub async fn user_details(
    data: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = path.into_inner();
    let user = data
        .users
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found("user", &username))?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST|PUT /users/password/change/
pub async fn change_password(
    data: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let caller = permissions::authenticated(identity.user())?;

    let input: PasswordChange = parse_body(&body)?;
    let old_password = required("old_password", input.old_password)?;
    if !data
        .auth
        .verify_password(&old_password, &caller.password_hash)
        .await
    {
        return Err(AppError::ValidationError(
            "old_password: your old password was entered incorrectly".to_string(),
        )
        .into());
    }
    let new_password = validation::password("new_password", input.new_password.as_deref())?;

    let hash = data.auth.hash_password(&new_password).await?;
    data.users.set_password(caller.id, &hash).await?;

    log::info!("user {} changed their password", caller.uuid);
    Ok(HttpResponse::Ok().json(json!({ "detail": "password updated successfully" })))
}

/// POST /users/register/
pub async fn register(
    data: web::Data<AppState>,
    _identity: Identity,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let input: Credentials = parse_body(&body)?;
    let username = validation::username(input.username.as_deref())?;
    let password = validation::password("password", input.password.as_deref())?;

    let hash = data.auth.hash_password(&password).await?;
    let user = data.users.create_user(NewUser::new(username, hash)).await?;

    log::info!("registered user {} ({})", user.username, user.uuid);
    Ok(HttpResponse::Created().json(user))
}
