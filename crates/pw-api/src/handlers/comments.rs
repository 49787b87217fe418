//! Comment endpoints. Comments can be created, read and deleted, never edited.

use actix_web::{web, HttpResponse};
use pw_core::error::AppError;
use pw_core::models::NewComment;
use pw_core::permissions::{self, Action};
use pw_core::validation::{self, COMMENT_TEXT_MAX};
use serde::Deserialize;
use uuid::Uuid;

use super::posts::find_post;
use super::{parse_body, AppState};
use crate::error::ApiResult;
use crate::identity::Identity;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: Option<String>,
}

/// GET /posts/{post_uuid}/comments/
pub async fn list_comments(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    permissions::authenticated_or_read_only(identity.user(), Action::Read)?;

    let comments = data.comments.list_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// POST /posts/{post_uuid}/comments/
///
/// The post is resolved before the caller is checked, so an unknown post is a 404
/// even for anonymous callers.
pub async fn create_comment(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let post = find_post(&data, path.into_inner()).await?;
    let caller = permissions::authenticated(identity.user())?;

    let input: CommentBody = parse_body(&body)?;
    let text = validation::text("text", input.text.as_deref(), COMMENT_TEXT_MAX)?;

    let comment = data
        .comments
        .create_comment(NewComment::new(caller.id, post.id, text))
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// GET /posts/{post_uuid}/comments/{comment_uuid}/
pub async fn retrieve_comment(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (post_uuid, comment_uuid) = path.into_inner();
    let comment = data
        .comments
        .get_comment(post_uuid, comment_uuid)
        .await?
        .ok_or_else(|| AppError::not_found("comment", comment_uuid))?;
    permissions::author_or_read_only(identity.user(), Action::Read, &comment)?;

    Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /posts/{post_uuid}/comments/{comment_uuid}/
pub async fn delete_comment(
    data: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (post_uuid, comment_uuid) = path.into_inner();
    let comment = data
        .comments
        .get_comment(post_uuid, comment_uuid)
        .await?
        .ok_or_else(|| AppError::not_found("comment", comment_uuid))?;
    permissions::author_or_read_only(identity.user(), Action::Write, &comment)?;

    data.comments.delete_comment(comment.id).await?;
    log::info!("comment {} on post {} deleted by its author", comment.uuid, comment.post);
    Ok(HttpResponse::NoContent().finish())
}
