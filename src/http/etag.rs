//! Content fingerprint module
//!
//! Provides strong `ETag` generation over the exact bytes of a response body.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// The tag carries the body length in hex followed by a hash of the bytes, so
/// identical payloads always produce identical tags.
///
/// # Arguments
/// * `content` - Response body bytes
///
/// # Returns
/// Quoted `ETag` string, e.g., `"b-5eb63bbbe01eeed0"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{:x}-{v:x}\"", content.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with("\"b-"));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 4);
    }

    #[test]
    fn test_etag_consistency() {
        let etag1 = generate_etag(b"same content");
        let etag2 = generate_etag(b"same content");
        assert_eq!(etag1, etag2);
    }

    #[test]
    fn test_etag_difference() {
        let etag1 = generate_etag(b"content a");
        let etag2 = generate_etag(b"content b");
        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_empty_body_etag() {
        let etag = generate_etag(b"");
        assert!(etag.starts_with("\"0-"));
    }
}
