//! # pw-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.
//! Every handler runs the same sequence: resolve the target, check permissions,
//! then parse and validate the body, then touch the store.

pub mod comments;
pub mod posts;
pub mod users;

use pw_core::error::AppError;
use pw_core::traits::{AuthProvider, CommentRepo, PostRepo, UserRepo};
use serde::de::DeserializeOwned;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub users: Box<dyn UserRepo>,
    pub posts: Box<dyn PostRepo>,
    pub comments: Box<dyn CommentRepo>,
    pub auth: Box<dyn AuthProvider>,
}

/// Bodies are taken as raw bytes and parsed here, after lookup and permission checks.
/// An empty body reads as `{}`, so missing fields are reported as such.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("malformed request body: {e}")))
}

fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(AppError::ValidationError(format!(
            "{field}: this field may not be blank"
        ))),
        None => Err(AppError::ValidationError(format!(
            "{field}: this field is required"
        ))),
    }
}
