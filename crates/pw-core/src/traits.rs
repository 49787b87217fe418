//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, NewComment, NewPost, NewUser, Post, TokenPair, User, VerifiedToken};

/// Persistence contract for user accounts.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `AppError::Conflict` if the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_uuid(&self, uuid: Uuid) -> Result<Option<User>>;
    async fn set_password(&self, user_id: i64, password_hash: &str) -> Result<()>;
}

/// Persistence contract for posts.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<Post>;
    async fn get_post(&self, uuid: Uuid) -> Result<Option<Post>>;

    /// Replaces the text when given and marks the post as edited either way.
    async fn update_post(&self, id: i64, text: Option<String>) -> Result<Post>;
    /// Removes the post together with its comments.
    async fn delete_post(&self, id: i64) -> Result<()>;

    /// Atomically bumps `pins` by one. Returns `false` if no post has this uuid.
    async fn pin_post(&self, uuid: Uuid) -> Result<bool>;

    // Feeds, newest first
    async fn list_posts_by_author_id(&self, author_id: i64) -> Result<Vec<Post>>;
    async fn list_posts_by_author_uuid(&self, author: Uuid) -> Result<Vec<Post>>;
    async fn list_recent_posts(&self) -> Result<Vec<Post>>;
}

/// Persistence contract for comments.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create_comment(&self, comment: NewComment) -> Result<Comment>;
    /// Newest first.
    async fn list_comments(&self, post: Uuid) -> Result<Vec<Comment>>;
    /// Both keys must point at the same record.
    async fn get_comment(&self, post: Uuid, comment: Uuid) -> Result<Option<Comment>>;
    async fn delete_comment(&self, id: i64) -> Result<()>;
}

/// Credential and token contract.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Produces a salted PHC string for storage.
    async fn hash_password(&self, password: &str) -> Result<String>;

    /// Checks a plaintext password against a stored hash.
    async fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// Issues a fresh access/refresh pair for the user.
    fn issue_tokens(&self, user: &User) -> Result<TokenPair>;

    /// Exchanges a refresh token for a new access token.
    fn refresh(&self, refresh_token: &str) -> Result<String>;

    /// Validates signature and expiry of any token this provider issued.
    fn verify(&self, token: &str) -> Result<VerifiedToken>;
}
