//! Caller identity derived from the `Authorization: Bearer <access token>` header.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, LocalBoxFuture};
use pw_core::error::AppError;
use pw_core::models::{TokenKind, User};

use crate::error::ApiError;
use crate::handlers::AppState;

/// Who is making the request. Scoped to a single request.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    User(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::User(user) => Some(user),
            Identity::Anonymous => None,
        }
    }
}

/// Requests without a Bearer credential are anonymous rather than rejected.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

impl FromRequest for Identity {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(token) = bearer_token(req) else {
            return Box::pin(ready(Ok(Identity::Anonymous)));
        };

        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            return Box::pin(ready(Err(ApiError(AppError::Internal(
                "web::Data<AppState> is missing".to_string(),
            )))));
        };

        Box::pin(async move {
            let verified = state.auth.verify(&token)?;
            if verified.kind != TokenKind::Access {
                return Err(AppError::Unauthorized("token has wrong type".to_string()).into());
            }

            match state.users.get_user_by_uuid(verified.subject).await? {
                Some(user) => Ok(Identity::User(user)),
                None => Err(AppError::Unauthorized("user not found".to_string()).into()),
            }
        })
    }
}
