//! # Permissions
//!
//! Authorization predicates evaluated per request against `(caller, target)`.
//! Handlers compose them explicitly; nothing is inherited.
//!
//! Callers are expected to resolve the target entity *before* asking for a
//! decision, so a missing entity surfaces as `NotFound` rather than `Forbidden`.

use crate::error::{AppError, Result};
use crate::models::{Comment, Post, User};

/// Whether an operation only reads or also mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// Anything with a single owning user.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

/// The caller must be logged in, whatever the action.
pub fn authenticated(caller: Option<&User>) -> Result<&User> {
    caller.ok_or_else(|| {
        AppError::Unauthorized("authentication credentials were not provided".to_string())
    })
}

/// Anonymous callers may only read.
pub fn authenticated_or_read_only(caller: Option<&User>, action: Action) -> Result<()> {
    match action {
        Action::Read => Ok(()),
        Action::Write => authenticated(caller).map(|_| ()),
    }
}

/// Anyone may read; only the entity's author may write.
pub fn author_or_read_only<E: Authored>(
    caller: Option<&User>,
    action: Action,
    entity: &E,
) -> Result<()> {
    if action == Action::Read {
        return Ok(());
    }

    let caller = authenticated(caller)?;
    if caller.id != entity.author_id() {
        return Err(AppError::Forbidden(
            "you do not have permission to perform this action".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(id: i64) -> User {
        User {
            id,
            uuid: Uuid::new_v4(),
            username: format!("user{id}"),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }
    }

    fn post_by(author: &User) -> Post {
        Post {
            id: 1,
            uuid: Uuid::new_v4(),
            text: "hello".into(),
            pins: 0,
            date_created: Utc::now(),
            visible: true,
            edited: false,
            author_id: author.id,
            author: author.uuid,
        }
    }

    #[test]
    fn anonymous_may_read_but_not_write() {
        assert!(authenticated_or_read_only(None, Action::Read).is_ok());
        assert!(matches!(
            authenticated_or_read_only(None, Action::Write),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn only_author_may_write() {
        let alice = user(1);
        let bob = user(2);
        let post = post_by(&alice);

        assert!(author_or_read_only(Some(&alice), Action::Write, &post).is_ok());
        assert!(author_or_read_only(Some(&bob), Action::Read, &post).is_ok());
        assert!(matches!(
            author_or_read_only(Some(&bob), Action::Write, &post),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn anonymous_write_is_unauthenticated_not_forbidden() {
        let alice = user(1);
        let post = post_by(&alice);
        assert!(matches!(
            author_or_read_only(None, Action::Write, &post),
            Err(AppError::Unauthorized(_))
        ));
    }
}
