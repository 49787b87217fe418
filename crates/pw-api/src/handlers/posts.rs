//! Post endpoints: own-post list/create, detail, pin and the two public feeds.

use actix_web::{web, HttpResponse};
use pw_core::error::AppError;
use pw_core::models::{NewPost, Post};
use pw_core::permissions::{self, Action};
use pw_core::validation::{self, POST_TEXT_MAX};
use serde::Deserialize;
use uuid::Uuid;

use super::{parse_body, AppState};
use crate::error::ApiResult;
use crate::identity::Identity;

/// Only `text` is writable; anything else in the body is ignored.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub text: Option<String>,
}

pub(crate) async fn find_post(data: &AppState, uuid: Uuid) -> Result<Post, AppError> {
    data.posts
        .get_post(uuid)
        .await?
        .ok_or_else(|| AppError::not_found("post", uuid))
}

/// GET /posts/
pub async fn list_own_posts(
    data: web::Data<AppState>,
    identity: Identity,
) -> ApiResult<HttpResponse> {
    let caller = permissions::authenticated(identity.user())?;
    let posts = data.posts.list_posts_by_author_id(caller.id).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /posts/
pub async fn create_post(
    data: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let caller = permissions::authenticated(identity.user())?;
    let input: PostBody = parse_body(&body)?;
    let text = validation::text("text", input.text.as_deref(), POST_TEXT_MAX)?;

    let post = data.posts.create_post(NewPost::new(caller.id, text)).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /posts/{uuid}/
pub async fn retrieve_post(
    data: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let post = find_post(&data, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /posts/{uuid}/
pub async fn replace_post(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    update(&data, &identity, path.into_inner(), &body, false).await
}

/// PATCH /posts/{uuid}/
pub async fn patch_post(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    update(&data, &identity, path.into_inner(), &body, true).await
}

async fn update(
    data: &AppState,
    identity: &Identity,
    uuid: Uuid,
    body: &[u8],
    partial: bool,
) -> ApiResult<HttpResponse> {
    let post = find_post(data, uuid).await?;
    permissions::author_or_read_only(identity.user(), Action::Write, &post)?;

    let input: PostBody = parse_body(body)?;
    let text = match input.text {
        None if partial => None,
        text => Some(validation::text("text", text.as_deref(), POST_TEXT_MAX)?),
    };

    let post = data.posts.update_post(post.id, text).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{uuid}/
pub async fn delete_post(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let post = find_post(&data, path.into_inner()).await?;
    permissions::author_or_read_only(identity.user(), Action::Write, &post)?;

    data.posts.delete_post(post.id).await?;
    log::info!("post {} deleted by its author", post.uuid);
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /posts/{uuid}/pin/
///
/// Every call counts; there is no one-pin-per-user rule.
pub async fn pin_post(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    permissions::authenticated(identity.user())?;

    let uuid = path.into_inner();
    if !data.posts.pin_post(uuid).await? {
        return Err(AppError::not_found("post", uuid).into());
    }
    Ok(HttpResponse::Ok().finish())
}

/// GET /users/{user_uuid}/posts/
pub async fn list_user_posts(
    data: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let posts = data.posts.list_posts_by_author_uuid(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/recent/
pub async fn recent_posts(
    data: web::Data<AppState>,
    _identity: Identity,
) -> ApiResult<HttpResponse> {
    let posts = data.posts.list_recent_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}
