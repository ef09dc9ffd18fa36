use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A navigation category. Order keys are 1-based, dense, and globally unique:
/// at any committed state the keys of all existing categories are exactly
/// `{1..N}` for N = category count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "order")]
    pub order_num: i64,
}

/// A navigation link. `category_id` is a weak reference into the categories
/// table; the site does not own the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub category_id: Option<i64>,
}

/// One `(id, order)` assignment within a bulk reorder request. The full
/// request is expected to cover every category exactly once with keys
/// forming a permutation of `1..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPlacement {
    pub id: i64,
    #[serde(rename = "order")]
    pub order_num: i64,
}

/// Trims `name` and rejects empty labels.
pub fn validate_label(name: &str) -> Result<&str, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    Ok(trimmed)
}

/// Trims `url` and requires an http(s) scheme.
pub fn validate_url(url: &str) -> Result<&str, CoreError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("url must not be empty".into()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "url must start with http:// or https://: {trimmed}"
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_trimmed() {
        assert_eq!(validate_label("  Search  ").unwrap(), "Search");
    }

    #[test]
    fn empty_label_rejected() {
        assert!(validate_label("   ").is_err());
        assert!(validate_label("").is_err());
    }

    #[test]
    fn url_requires_http_scheme() {
        assert_eq!(
            validate_url("https://example.com").unwrap(),
            "https://example.com"
        );
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn category_serializes_order_field() {
        let cat = Category {
            id: 3,
            name: "News".into(),
            order_num: 2,
        };
        let json = serde_json::to_value(&cat).unwrap();
        assert_eq!(json["order"], 2);
        assert!(json.get("order_num").is_none());
    }
}
