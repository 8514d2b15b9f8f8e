//! Vary header merge module

/// Merge `field` into an existing `Vary` header value
///
/// Field names are compared case-insensitively and never duplicated. A `*`
/// on either side collapses the result to `*`. `field` may itself be a
/// comma-separated list.
///
/// # Examples
/// ```
/// use resfmt::http::vary::merge;
/// assert_eq!(merge(None, "Origin"), "Origin");
/// assert_eq!(merge(Some("Accept"), "origin, Accept"), "Accept, origin");
/// ```
pub fn merge(existing: Option<&str>, field: &str) -> String {
    let mut fields: Vec<&str> = split_fields(existing.unwrap_or_default()).collect();

    if fields.contains(&"*") {
        return "*".to_string();
    }

    for candidate in split_fields(field) {
        if candidate == "*" {
            return "*".to_string();
        }
        if !fields.iter().any(|f| f.eq_ignore_ascii_case(candidate)) {
            fields.push(candidate);
        }
    }

    fields.join(", ")
}

fn split_fields(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|f| !f.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_into_empty() {
        assert_eq!(merge(None, "Origin"), "Origin");
        assert_eq!(merge(Some(""), "Origin"), "Origin");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge(None, "Origin");
        let twice = merge(Some(&once), "Origin");
        assert_eq!(twice, "Origin");
    }

    #[test]
    fn test_merge_case_insensitive() {
        assert_eq!(merge(Some("Accept-Encoding"), "accept-encoding"), "Accept-Encoding");
    }

    #[test]
    fn test_merge_appends_in_order() {
        assert_eq!(
            merge(Some("Accept"), "Origin, User-Agent"),
            "Accept, Origin, User-Agent"
        );
    }

    #[test]
    fn test_merge_wildcard() {
        assert_eq!(merge(Some("Accept"), "*"), "*");
        assert_eq!(merge(Some("*"), "Origin"), "*");
    }
}
