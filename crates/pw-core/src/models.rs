//! # Domain Models
//!
//! These structs represent the core entities of Pinwall.
//! Every entity carries two identities: the store-assigned numeric `id`, which never
//! leaves the server, and a random UUID v4 used as the external handle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: i64,
    pub uuid: Uuid,
    /// The natural login key; unique across the store.
    pub username: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// A short text post owned by a user.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(skip_serializing)]
    pub id: i64,
    pub uuid: Uuid,
    pub text: String,
    /// Like counter. Only ever incremented.
    pub pins: i64,
    pub date_created: DateTime<Utc>,
    /// Reserved flag; no endpoint reads it.
    pub visible: bool,
    pub edited: bool,
    #[serde(skip_serializing)]
    pub author_id: i64,
    /// External reference to the author (their uuid).
    pub author: Uuid,
}

/// A comment attached to exactly one post.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    #[serde(skip_serializing)]
    pub id: i64,
    pub uuid: Uuid,
    pub text: String,
    pub date_created: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub author_id: i64,
    pub author: Uuid,
    #[serde(skip_serializing)]
    pub post_id: i64,
    pub post: Uuid,
}

/// A post about to be persisted. Server-side fields are assigned here, never by the caller.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub uuid: Uuid,
    pub author_id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
}

impl NewPost {
    pub fn new(author_id: i64, text: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            author_id,
            text,
            date_created: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub uuid: Uuid,
    pub author_id: i64,
    pub post_id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
}

impl NewComment {
    pub fn new(author_id: i64, post_id: i64, text: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            author_id,
            post_id,
            text,
            date_created: Utc::now(),
        }
    }
}

/// An account about to be registered.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uuid: Uuid,
    pub username: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            username,
            password_hash,
            date_joined: Utc::now(),
        }
    }
}

/// Access/refresh pair handed out at login.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Which of the two JWT flavours a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// The decoded, validated content of a token.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub subject: Uuid,
    pub kind: TokenKind,
}
