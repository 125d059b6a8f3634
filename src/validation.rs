//! Field constraints checked locally before anything is sent to the store.
//!
//! All inputs are trimmed first. Optional fields that trim to nothing are
//! treated as absent.

use url::Url;

use crate::errors::AppError;

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const URL_MAX: usize = 2000;
pub const GUEST_NAME_MAX: usize = 50;

pub fn title(field: &str, raw: &str) -> Result<String, AppError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::validation(field, "is required"));
    }
    if value.chars().count() > TITLE_MAX {
        return Err(AppError::validation(
            field,
            format!("must be at most {TITLE_MAX} characters"),
        ));
    }
    Ok(value.to_string())
}

pub fn optional_text(field: &str, raw: Option<&str>, max: usize) -> Result<Option<String>, AppError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) if value.chars().count() > max => Err(AppError::validation(
            field,
            format!("must be at most {max} characters"),
        )),
        Some(value) => Ok(Some(value.to_string())),
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn optional_url(field: &str, raw: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(value) = non_empty(raw) else {
        return Ok(None);
    };
    if value.chars().count() > URL_MAX {
        return Err(AppError::validation(field, "URL too long"));
    }
    let parsed = Url::parse(value).map_err(|_| AppError::validation(field, "must be a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::validation(field, "only HTTP/HTTPS URLs allowed"));
    }
    Ok(Some(value.to_string()))
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// Display name a guest reserves under: letters, digits, whitespace,
/// hyphen and apostrophe, 1 to 50 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestName(String);

impl GuestName {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(AppError::validation("guest_name", "is required"));
        }
        if value.chars().count() > GUEST_NAME_MAX {
            return Err(AppError::validation(
                "guest_name",
                format!("must be at most {GUEST_NAME_MAX} characters"),
            ));
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c == '\'';
        if !value.chars().all(allowed) {
            return Err(AppError::validation("guest_name", "contains invalid characters"));
        }
        Ok(GuestName(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_trimmed_and_bounded() {
        assert_eq!(title("title", "  Birthday ").unwrap(), "Birthday");
        assert!(title("title", "   ").is_err());
        assert!(title("title", &"a".repeat(TITLE_MAX)).is_ok());
        assert!(title("title", &"a".repeat(TITLE_MAX + 1)).is_err());
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(optional_text("description", Some("  "), DESCRIPTION_MAX).unwrap(), None);
        assert_eq!(optional_text("description", None, DESCRIPTION_MAX).unwrap(), None);
        assert!(optional_text("description", Some(&"x".repeat(501)), DESCRIPTION_MAX).is_err());
    }

    #[test]
    fn urls_must_be_absolute_http() {
        assert_eq!(
            optional_url("link", Some(" https://shop.example/item?id=1 ")).unwrap(),
            Some("https://shop.example/item?id=1".to_string())
        );
        assert!(optional_url("link", Some("http://example.com")).is_ok());
        assert!(optional_url("link", Some("ftp://example.com/file")).is_err());
        assert!(optional_url("link", Some("javascript:alert(1)")).is_err());
        assert!(optional_url("link", Some("/relative/path")).is_err());
        assert_eq!(optional_url("link", Some("")).unwrap(), None);

        let long = format!("https://example.com/{}", "a".repeat(URL_MAX));
        assert!(optional_url("image_url", Some(&long)).is_err());
    }

    #[test]
    fn guest_names_follow_the_allowed_alphabet() {
        assert_eq!(GuestName::parse("  Mary-Jane O'Neil ").unwrap().as_str(), "Mary-Jane O'Neil");
        assert!(GuestName::parse("Guest 42").is_ok());
        assert!(GuestName::parse("").is_err());
        assert!(GuestName::parse("    ").is_err());
        assert!(GuestName::parse("<script>").is_err());
        assert!(GuestName::parse("alice@example.com").is_err());
        assert!(GuestName::parse(&"a".repeat(GUEST_NAME_MAX)).is_ok());
        assert!(GuestName::parse(&"a".repeat(GUEST_NAME_MAX + 1)).is_err());
    }
}
