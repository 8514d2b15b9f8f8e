//! Header value input and `Content-Type` normalization

use crate::http::mime;

/// A header value: a single value or an ordered list joined with `", "`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderInput {
    One(String),
    Many(Vec<String>),
}

impl HeaderInput {
    /// Serialized header value
    pub fn join(&self) -> String {
        match self {
            Self::One(value) => value.clone(),
            Self::Many(values) => values.join(", "),
        }
    }
}

impl From<&str> for HeaderInput {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for HeaderInput {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&String> for HeaderInput {
    fn from(value: &String) -> Self {
        Self::One(value.clone())
    }
}

impl From<usize> for HeaderInput {
    fn from(value: usize) -> Self {
        Self::One(value.to_string())
    }
}

impl From<u64> for HeaderInput {
    fn from(value: u64) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for HeaderInput {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for HeaderInput {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for HeaderInput {
    fn from(values: &[&str]) -> Self {
        Self::Many(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderInput {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Append the default charset to a `Content-Type` value lacking one
///
/// `text/plain` becomes `text/plain; charset=utf-8`; values that already
/// carry a charset parameter, or whose type has no charset mapping, are
/// returned unchanged.
pub fn with_default_charset(value: &str) -> String {
    if has_charset(value) {
        return value.to_string();
    }
    match mime::charset(value) {
        Some(charset) => format!("{value}; charset={}", charset.to_ascii_lowercase()),
        None => value.to_string(),
    }
}

fn has_charset(value: &str) -> bool {
    value.split(';').skip(1).any(|param| {
        param
            .split_once('=')
            .is_some_and(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
    })
}
