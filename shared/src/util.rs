//! Small helpers shared by server and clients

use serde::{Deserialize, Deserializer};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Distinguish an absent field from an explicit `null` in PATCH-style payloads.
///
/// Use with `#[serde(default, deserialize_with = "shared::util::double_option")]`:
/// - field missing → `None`
/// - field `null` → `Some(None)`
/// - field set → `Some(Some(v))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Build a URL slug from a display name: lower-case ASCII alphanumerics joined by `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// A slug is non-empty lower-case ASCII alphanumerics separated by single dashes.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        parent_id: Option<Option<i64>>,
    }

    #[test]
    fn test_double_option() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.parent_id, None);
        let p: Patch = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
        assert_eq!(p.parent_id, Some(None));
        let p: Patch = serde_json::from_str(r#"{"parent_id":4}"#).unwrap();
        assert_eq!(p.parent_id, Some(Some(4)));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust & Systems"), "rust-systems");
        assert_eq!(slugify("  Hello,  World!  "), "hello-world");
        assert_eq!(slugify("Año 2024"), "a-o-2024");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("web-dev"));
        assert!(is_valid_slug("rust2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Web-Dev"));
        assert!(!is_valid_slug("-web"));
        assert!(!is_valid_slug("web--dev"));
        assert!(!is_valid_slug("web dev"));
    }
}
