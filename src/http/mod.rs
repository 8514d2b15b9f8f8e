//! HTTP helper layer
//!
//! Small, self-contained helpers the response writer relies on: MIME lookup,
//! charset defaults, content fingerprints, Content-Disposition formatting and
//! `Vary` merging. None of them touch a response channel.

pub mod disposition;
pub mod etag;
pub mod mime;
pub mod vary;

// Re-export commonly used items
pub use disposition::DispositionType;
pub use etag::generate_etag;
