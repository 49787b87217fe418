//! pinwall/crates/pw-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Pinwall.

pub mod models;
pub mod traits;
pub mod error;
pub mod permissions;
pub mod validation;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;


#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn test_new_post_defaults() {
        let post = NewPost::new(7, "Hello Rust!".to_string());
        assert_eq!(post.author_id, 7);
        assert_eq!(post.uuid.get_version_num(), 4);
        assert!(post.date_created <= chrono::Utc::now());
    }

    #[test]
    fn test_internal_ids_are_not_serialized() {
        let user = User {
            id: 42,
            uuid: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            date_joined: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_post_serializes_author_as_uuid() {
        let author = uuid::Uuid::new_v4();
        let post = Post {
            id: 1,
            uuid: uuid::Uuid::new_v4(),
            text: "hi".to_string(),
            pins: 3,
            date_created: chrono::Utc::now(),
            visible: true,
            edited: false,
            author_id: 9,
            author,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["author"], author.to_string());
        assert_eq!(json["pins"], 3);
        assert!(json.get("author_id").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_token_kind_wire_names() {
        assert_eq!(serde_json::to_value(TokenKind::Refresh).unwrap(), "refresh");
        assert_eq!(serde_json::to_value(TokenKind::Access).unwrap(), "access");
    }
}
