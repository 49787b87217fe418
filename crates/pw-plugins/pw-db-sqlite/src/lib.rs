//! # pw-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `pw-core` domain models.

use std::str::FromStr;

use async_trait::async_trait;
use pw_core::error::{AppError, Result};
use pw_core::models::{Comment, NewComment, NewPost, NewUser, Post, User};
use pw_core::traits::{CommentRepo, PostRepo, UserRepo};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite};
use uuid::Uuid;

/// Posts joined with their author's external uuid.
const POST_SELECT: &str = "SELECT p.id, p.uuid, p.text, p.pins, p.date_created, p.visible, \
     p.edited, p.author_id, u.uuid AS author_uuid \
     FROM posts p JOIN users u ON u.id = p.author_id";

/// Comments joined with the external uuids of their author and post.
const COMMENT_SELECT: &str = "SELECT c.id, c.uuid, c.text, c.date_created, c.author_id, \
     c.post_id, u.uuid AS author_uuid, p.uuid AS post_uuid \
     FROM comments c \
     JOIN users u ON u.id = c.author_id \
     JOIN posts p ON p.id = c.post_id";

const USER_SELECT: &str = "SELECT id, uuid, username, password, date_joined FROM users";

/// One store for users, posts and comments, sharing a single pool.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        Self::connect(url, 5).await
    }

    /// Opens (creating if needed) the database and applies pending migrations.
    ///
    /// In-memory databases live only as long as their connection, so they get
    /// exactly one that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!().run(&pool).await?;
        log::info!("sqlite store ready ({url})");

        Ok(Self { pool })
    }

    async fn fetch_post_by_id(&self, id: i64) -> Result<Post> {
        let sql = format!("{POST_SELECT} WHERE p.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .db()?;

        match row {
            Some(row) => post_from_row(&row).db(),
            None => Err(AppError::not_found("post", id)),
        }
    }

    async fn fetch_comment_by_id(&self, id: i64) -> Result<Comment> {
        let sql = format!("{COMMENT_SELECT} WHERE c.id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .db()?;

        match row {
            Some(row) => comment_from_row(&row).db(),
            None => Err(AppError::not_found("comment", id)),
        }
    }

    async fn collect_posts<'a>(
        &self,
        query: Query<'a, Sqlite, SqliteArguments<'a>>,
    ) -> Result<Vec<Post>> {
        query
            .fetch_all(&self.pool)
            .await
            .db()?
            .iter()
            .map(|row| post_from_row(row).db())
            .collect()
    }
}

// Helper for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> std::result::Result<Uuid, sqlx::Error> {
    Uuid::from_slice(blob).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn user_from_row(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        uuid: blob_to_uuid(&row.try_get::<Vec<u8>, _>("uuid")?)?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password")?,
        date_joined: row.try_get("date_joined")?,
    })
}

fn post_from_row(row: &SqliteRow) -> std::result::Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        uuid: blob_to_uuid(&row.try_get::<Vec<u8>, _>("uuid")?)?,
        text: row.try_get("text")?,
        pins: row.try_get("pins")?,
        date_created: row.try_get("date_created")?,
        visible: row.try_get("visible")?,
        edited: row.try_get("edited")?,
        author_id: row.try_get("author_id")?,
        author: blob_to_uuid(&row.try_get::<Vec<u8>, _>("author_uuid")?)?,
    })
}

fn comment_from_row(row: &SqliteRow) -> std::result::Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        uuid: blob_to_uuid(&row.try_get::<Vec<u8>, _>("uuid")?)?,
        text: row.try_get("text")?,
        date_created: row.try_get("date_created")?,
        author_id: row.try_get("author_id")?,
        author: blob_to_uuid(&row.try_get::<Vec<u8>, _>("author_uuid")?)?,
        post_id: row.try_get("post_id")?,
        post: blob_to_uuid(&row.try_get::<Vec<u8>, _>("post_uuid")?)?,
    })
}

/// Folds driver errors into the domain taxonomy.
trait DbResultExt<T> {
    fn db(self) -> Result<T>;
}

impl<T> DbResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn db(self) -> Result<T> {
        self.map_err(internal)
    }
}

fn internal(e: sqlx::Error) -> AppError {
    AppError::Internal(format!("sqlite: {e}"))
}

#[async_trait]
impl UserRepo for SqliteRepo {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query(
            "INSERT INTO users (uuid, username, password, date_joined) VALUES (?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(user.uuid))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.date_joined)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(User {
                id: done.last_insert_rowid(),
                uuid: user.uuid,
                username: user.username,
                password_hash: user.password_hash,
                date_joined: user.date_joined,
            }),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::Conflict(
                format!("a user with username {} already exists", user.username),
            )),
            Err(e) => Err(internal(e)),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE username = ?");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .db()?;

        row.as_ref().map(user_from_row).transpose().db()
    }

    async fn get_user_by_uuid(&self, uuid: Uuid) -> Result<Option<User>> {
        let sql = format!("{USER_SELECT} WHERE uuid = ?");
        let row = sqlx::query(&sql)
            .bind(uuid_to_blob(uuid))
            .fetch_optional(&self.pool)
            .await
            .db()?;

        row.as_ref().map(user_from_row).transpose().db()
    }

    async fn set_password(&self, user_id: i64, password_hash: &str) -> Result<()> {
        let done = sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .db()?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("user", user_id));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepo for SqliteRepo {
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let done = sqlx::query(
            "INSERT INTO posts (uuid, text, date_created, author_id) VALUES (?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(post.uuid))
        .bind(&post.text)
        .bind(post.date_created)
        .bind(post.author_id)
        .execute(&self.pool)
        .await
        .db()?;

        self.fetch_post_by_id(done.last_insert_rowid()).await
    }

    async fn get_post(&self, uuid: Uuid) -> Result<Option<Post>> {
        let sql = format!("{POST_SELECT} WHERE p.uuid = ?");
        let row = sqlx::query(&sql)
            .bind(uuid_to_blob(uuid))
            .fetch_optional(&self.pool)
            .await
            .db()?;

        row.as_ref().map(post_from_row).transpose().db()
    }

    async fn update_post(&self, id: i64, text: Option<String>) -> Result<Post> {
        let done = sqlx::query("UPDATE posts SET text = COALESCE(?, text), edited = 1 WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await
            .db()?;

        if done.rows_affected() == 0 {
            return Err(AppError::not_found("post", id));
        }
        self.fetch_post_by_id(id).await
    }

    /// Comments go in the same transaction so a failed delete leaves both intact.
    async fn delete_post(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await.db()?;

        sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .db()?;

        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .db()?;

        tx.commit().await.db()
    }

    async fn pin_post(&self, uuid: Uuid) -> Result<bool> {
        let done = sqlx::query("UPDATE posts SET pins = pins + 1 WHERE uuid = ?")
            .bind(uuid_to_blob(uuid))
            .execute(&self.pool)
            .await
            .db()?;

        Ok(done.rows_affected() > 0)
    }

    async fn list_posts_by_author_id(&self, author_id: i64) -> Result<Vec<Post>> {
        let sql = format!("{POST_SELECT} WHERE p.author_id = ? ORDER BY p.date_created DESC, p.id DESC");
        self.collect_posts(sqlx::query(&sql).bind(author_id)).await
    }

    async fn list_posts_by_author_uuid(&self, author: Uuid) -> Result<Vec<Post>> {
        let sql = format!("{POST_SELECT} WHERE u.uuid = ? ORDER BY p.date_created DESC, p.id DESC");
        self.collect_posts(sqlx::query(&sql).bind(uuid_to_blob(author))).await
    }

    async fn list_recent_posts(&self) -> Result<Vec<Post>> {
        let sql = format!("{POST_SELECT} ORDER BY p.date_created DESC, p.id DESC");
        self.collect_posts(sqlx::query(&sql)).await
    }
}

#[async_trait]
impl CommentRepo for SqliteRepo {
    async fn create_comment(&self, comment: NewComment) -> Result<Comment> {
        let done = sqlx::query(
            "INSERT INTO comments (uuid, text, date_created, author_id, post_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(comment.uuid))
        .bind(&comment.text)
        .bind(comment.date_created)
        .bind(comment.author_id)
        .bind(comment.post_id)
        .execute(&self.pool)
        .await
        .db()?;

        self.fetch_comment_by_id(done.last_insert_rowid()).await
    }

    async fn list_comments(&self, post: Uuid) -> Result<Vec<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE p.uuid = ? ORDER BY c.date_created DESC, c.id DESC");
        sqlx::query(&sql)
            .bind(uuid_to_blob(post))
            .fetch_all(&self.pool)
            .await
            .db()?
            .iter()
            .map(|row| comment_from_row(row).db())
            .collect()
    }

    async fn get_comment(&self, post: Uuid, comment: Uuid) -> Result<Option<Comment>> {
        let sql = format!("{COMMENT_SELECT} WHERE p.uuid = ? AND c.uuid = ?");
        let row = sqlx::query(&sql)
            .bind(uuid_to_blob(post))
            .bind(uuid_to_blob(comment))
            .fetch_optional(&self.pool)
            .await
            .db()?;

        row.as_ref().map(comment_from_row).transpose().db()
    }

    async fn delete_comment(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .db()?;
        Ok(())
    }
}
