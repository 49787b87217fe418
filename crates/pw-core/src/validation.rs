//! Input rules shared by every front end.

use crate::error::{AppError, Result};

pub const POST_TEXT_MAX: usize = 250;
pub const COMMENT_TEXT_MAX: usize = 100;
pub const USERNAME_MAX: usize = 150;
pub const PASSWORD_MIN: usize = 8;

/// Trims surrounding whitespace and enforces presence and a maximum length in characters.
pub fn text(field: &str, value: Option<&str>, max: usize) -> Result<String> {
    let value = value
        .ok_or_else(|| AppError::ValidationError(format!("{field}: this field is required")))?
        .trim();

    if value.is_empty() {
        return Err(AppError::ValidationError(format!(
            "{field}: this field may not be blank"
        )));
    }
    if value.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{field}: ensure this field has no more than {max} characters"
        )));
    }
    Ok(value.to_string())
}

/// Letters, digits and `@ . + - _`, at most 150 characters.
pub fn username(value: Option<&str>) -> Result<String> {
    let value = value.ok_or_else(|| {
        AppError::ValidationError("username: this field is required".to_string())
    })?;

    if value.is_empty() {
        return Err(AppError::ValidationError(
            "username: this field may not be blank".to_string(),
        ));
    }
    if value.chars().count() > USERNAME_MAX {
        return Err(AppError::ValidationError(format!(
            "username: ensure this field has no more than {USERNAME_MAX} characters"
        )));
    }
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(AppError::ValidationError(
            "username: may contain only letters, numbers, and @/./+/-/_ characters".to_string(),
        ));
    }
    Ok(value.to_string())
}

pub fn password(field: &str, value: Option<&str>) -> Result<String> {
    let value = value
        .ok_or_else(|| AppError::ValidationError(format!("{field}: this field is required")))?;

    if value.chars().count() < PASSWORD_MIN {
        return Err(AppError::ValidationError(format!(
            "{field}: this password is too short, it must contain at least {PASSWORD_MIN} characters"
        )));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(format!(
            "{field}: this password is entirely numeric"
        )));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_bounded() {
        assert_eq!(text("text", Some("  hi  "), 5).unwrap(), "hi");
        assert!(text("text", Some("   "), 5).is_err());
        assert!(text("text", None, 5).is_err());
        assert!(text("text", Some("abcdef"), 5).is_err());
    }

    #[test]
    fn text_limit_counts_characters_not_bytes() {
        let hearts = "♥".repeat(POST_TEXT_MAX);
        assert!(text("text", Some(&hearts), POST_TEXT_MAX).is_ok());
    }

    #[test]
    fn username_rejects_spaces_and_symbols() {
        assert!(username(Some("alice.b+test@x")).is_ok());
        assert!(username(Some("alice b")).is_err());
        assert!(username(Some("alice/b")).is_err());
        assert!(username(Some("")).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(password("password", Some("correct horse")).is_ok());
        assert!(password("password", Some("short")).is_err());
        assert!(password("password", Some("12345678901")).is_err());
    }
}
