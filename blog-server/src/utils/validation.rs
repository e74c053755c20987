//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! create/update handlers before anything reaches the repositories.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Category names, menu labels, footer section names
pub const MAX_NAME_LEN: usize = 200;

/// Category slugs
pub const MAX_SLUG_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Usernames
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length for dashboard accounts
pub const MIN_PASSWORD_LEN: usize = 8;

/// Menu hrefs
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a category slug (lower-case ASCII words joined by single dashes).
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    validate_required_text(slug, "slug", MAX_SLUG_LEN)?;
    if !shared::util::is_valid_slug(slug) {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidFormat,
            format!("Invalid slug '{slug}': use lower-case letters, digits and single dashes"),
        )
        .with_detail("field", "slug"));
    }
    Ok(())
}

/// Validate a menu link: an absolute path, an http(s) URL, or an anchor.
pub fn validate_href(href: &str) -> Result<(), AppError> {
    validate_required_text(href, "href", MAX_URL_LEN)?;
    let ok = href.starts_with('/')
        || href.starts_with('#')
        || href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("mailto:");
    if !ok || href.chars().any(char::is_whitespace) {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidFormat,
            format!("Invalid href '{href}'"),
        )
        .with_detail("field", "href"));
    }
    Ok(())
}

/// Validate an email address (shape only).
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        });
    if !valid {
        return Err(AppError::with_message(
            shared::ErrorCode::InvalidFormat,
            format!("Invalid email '{email}'"),
        )
        .with_detail("field", "email"));
    }
    Ok(())
}

/// Validate a new password before hashing.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            shared::ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}
