//! Content-Disposition formatting module
//!
//! Builds `Content-Disposition` header values, with an RFC 5987 `filename*`
//! parameter for names that are not plain printable ASCII.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Disposition type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DispositionType {
    /// Ask the client to save the payload
    #[default]
    Attachment,
    /// Let the client display the payload
    Inline,
}

impl DispositionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
        }
    }
}

impl fmt::Display for DispositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a `Content-Disposition` header value
///
/// Only the final path component of `filename` is used.
///
/// # Examples
/// ```
/// use resfmt::http::disposition::{format, DispositionType};
/// assert_eq!(
///     format("/srv/files/hello.txt", DispositionType::Attachment),
///     "attachment; filename=\"hello.txt\""
/// );
/// ```
pub fn format(filename: &str, kind: DispositionType) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if name.is_empty() {
        return kind.as_str().to_string();
    }

    if name.chars().all(is_printable_ascii) {
        return format!("{kind}; filename={}", quote(name));
    }

    let fallback: String = name
        .chars()
        .map(|c| if is_printable_ascii(c) { c } else { '?' })
        .collect();

    format!(
        "{kind}; filename={}; filename*=UTF-8''{}",
        quote(&fallback),
        encode_ext_value(name)
    )
}

const fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~')
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Percent-encode every byte outside the RFC 5987 `attr-char` set
fn encode_ext_value(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => char::from(b).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_attachment() {
        assert_eq!(
            format("hello.txt", DispositionType::Attachment),
            "attachment; filename=\"hello.txt\""
        );
    }

    #[test]
    fn test_inline_uses_basename() {
        assert_eq!(
            format("/var/data/report.pdf", DispositionType::Inline),
            "inline; filename=\"report.pdf\""
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(
            format("say \"hi\".txt", DispositionType::Attachment),
            "attachment; filename=\"say \\\"hi\\\".txt\""
        );
    }

    #[test]
    fn test_unicode_name_gets_extended_parameter() {
        assert_eq!(
            format("résumé.pdf", DispositionType::Attachment),
            "attachment; filename=\"r?sum?.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(format("", DispositionType::Inline), "inline");
    }
}
