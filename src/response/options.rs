//! Per-call options with named defaults
//!
//! Every field left as `None` falls back to the writer's [`ResponseConfig`],
//! whose own defaults are the constants below.
//!
//! [`ResponseConfig`]: crate::config::ResponseConfig

use crate::http::DispositionType;

/// Callback name used by `jsonp` unless configured otherwise
pub const DEFAULT_JSONP_CALLBACK: &str = "callback";

/// Status used by `redirect` unless configured otherwise
pub const DEFAULT_REDIRECT_STATUS: u16 = 302;

/// Disposition used by `attachment` unless configured otherwise
pub const DEFAULT_DISPOSITION: DispositionType = DispositionType::Attachment;

/// Options for `jsonp`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonpOptions<'a> {
    /// Name of the client-side function wrapping the JSON
    pub callback: Option<&'a str>,
}

impl<'a> JsonpOptions<'a> {
    pub const fn callback(name: &'a str) -> Self {
        Self {
            callback: Some(name),
        }
    }
}

/// Options for `redirect`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectOptions {
    pub status: Option<u16>,
}

impl RedirectOptions {
    pub const fn status(code: u16) -> Self {
        Self { status: Some(code) }
    }
}

/// Options for `attachment`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentOptions<'a> {
    /// File name shown to the client; the path's file name when absent
    pub name: Option<&'a str>,
    pub disposition: Option<DispositionType>,
}

impl<'a> AttachmentOptions<'a> {
    pub const fn named(name: &'a str) -> Self {
        Self {
            name: Some(name),
            disposition: None,
        }
    }

    #[must_use]
    pub const fn with_disposition(mut self, disposition: DispositionType) -> Self {
        self.disposition = Some(disposition);
        self
    }
}
