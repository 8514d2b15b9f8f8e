//! Response writer module
//!
//! Header/status primitives and the `send` finalization pipeline. The writer
//! holds no per-request state: every operation takes the response channel as
//! its first argument.

pub mod body;
pub mod header;
pub mod options;
mod status;

pub use body::{Body, BodyKind, Scalar};
pub use header::HeaderInput;
pub use options::{AttachmentOptions, JsonpOptions, RedirectOptions};
pub use status::STATUS_HELPERS;

use crate::channel::ResponseChannel;
use crate::config::ResponseConfig;
use crate::error::ResponseResult;
use crate::http::{etag, mime, vary};
use crate::logger;
use hyper::body::Bytes;
use serde::Serialize;

/// Headers describing a body, stripped for statuses that forbid one
const BODY_HEADERS: [&str; 3] = ["Content-Type", "Content-Length", "Transfer-Encoding"];

/// Whether a status code forbids a response body
const fn forbids_body(status: u16) -> bool {
    matches!(status, 204 | 304)
}

/// Stateless response formatting facade
#[derive(Debug, Clone, Default)]
pub struct ResponseWriter {
    config: ResponseConfig,
}

impl ResponseWriter {
    pub const fn new(config: ResponseConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ResponseConfig {
        &self.config
    }

    /// Set a header, overwriting any previous value
    ///
    /// Lists are joined with `", "`. A `Content-Type` without a charset gets
    /// the default charset of its MIME type appended, when one exists.
    pub fn set_header<C: ResponseChannel>(
        &self,
        res: &mut C,
        key: &str,
        value: impl Into<HeaderInput>,
    ) -> ResponseResult<()> {
        let mut value = value.into().join();
        if key.eq_ignore_ascii_case("content-type") {
            value = header::with_default_charset(&value);
        }
        res.set_header(key, &value)
    }

    /// Set a header only if the channel has no value for it yet
    pub fn set_header_if_absent<C: ResponseChannel>(
        &self,
        res: &mut C,
        key: &str,
        value: impl Into<HeaderInput>,
    ) -> ResponseResult<()> {
        match res.header(key) {
            Some(existing) if !existing.is_empty() => Ok(()),
            _ => self.set_header(res, key, value),
        }
    }

    /// Append values to a header, keeping what is already there
    pub fn append_header<C: ResponseChannel>(
        &self,
        res: &mut C,
        key: &str,
        value: impl Into<HeaderInput>,
    ) -> ResponseResult<()> {
        let value = value.into().join();
        match res.header(key) {
            Some(existing) if !existing.is_empty() => {
                self.set_header(res, key, format!("{existing}, {value}"))
            }
            _ => self.set_header(res, key, value),
        }
    }

    pub fn remove_header<C: ResponseChannel>(&self, res: &mut C, key: &str) -> ResponseResult<()> {
        res.remove_header(key)
    }

    /// Set the status code; no range validation happens here
    pub fn set_status<C: ResponseChannel>(&self, res: &mut C, code: u16) -> ResponseResult<()> {
        res.set_status(code)
    }

    /// Set `Content-Type` from an alias, extension or full MIME type
    ///
    /// `charset` overrides the type's default charset.
    pub fn content_type<C: ResponseChannel>(
        &self,
        res: &mut C,
        type_name: &str,
        charset: Option<&str>,
    ) -> ResponseResult<()> {
        let base = if type_name.contains('/') {
            type_name.to_string()
        } else {
            mime::lookup(type_name)
                .unwrap_or(mime::DEFAULT_TYPE)
                .to_string()
        };
        let value = match charset {
            Some(cs) => format!("{base}; charset={cs}"),
            None => base,
        };
        self.set_header(res, "Content-Type", value)
    }

    pub async fn write<C: ResponseChannel>(
        &self,
        res: &mut C,
        chunk: impl Into<Bytes>,
    ) -> ResponseResult<()> {
        res.write(chunk.into()).await
    }

    /// End the response; ending an already finished response does nothing
    pub async fn finish<C: ResponseChannel>(&self, res: &mut C) -> ResponseResult<()> {
        if res.is_finished() {
            logger::log_warning("finish called on a response that already ended");
            return Ok(());
        }
        res.end().await
    }

    /// Send a body and finalize the response
    ///
    /// Caller-set `Content-Type`, `ETag` and status are kept. `Content-Length`
    /// always reflects the bytes sent. For 204 and 304 the body and the
    /// headers describing it are dropped.
    pub async fn send<C: ResponseChannel>(
        &self,
        res: &mut C,
        body: impl Into<Body>,
    ) -> ResponseResult<()> {
        let body = body.into();
        let kind = body.kind();
        let payload = body.into_bytes();

        let content_type = mime::lookup(kind.default_type()).unwrap_or(mime::DEFAULT_TYPE);
        self.set_header_if_absent(res, "Content-Type", content_type)?;

        if !payload.is_empty() {
            self.set_header(res, "Content-Length", payload.len())?;
        }

        self.set_header_if_absent(res, "ETag", etag::generate_etag(&payload))?;

        let payload = if forbids_body(res.status()) {
            for key in BODY_HEADERS {
                res.remove_header(key)?;
            }
            Bytes::new()
        } else {
            payload
        };

        res.write(payload).await?;
        self.finish(res).await
    }

    /// Send a value as JSON
    pub async fn json<C: ResponseChannel, T: Serialize + ?Sized>(
        &self,
        res: &mut C,
        body: &T,
    ) -> ResponseResult<()> {
        let body = Body::json(body)?;
        self.set_header_if_absent(res, "Content-Type", "application/json")?;
        self.send(res, body).await
    }

    /// Send a value as a JSONP script
    ///
    /// The callback name is written verbatim; callers must not pass
    /// untrusted input.
    pub async fn jsonp<C: ResponseChannel, T: Serialize + ?Sized>(
        &self,
        res: &mut C,
        body: &T,
        options: JsonpOptions<'_>,
    ) -> ResponseResult<()> {
        let callback = options.callback.unwrap_or(&self.config.jsonp_callback);
        let json = serde_json::to_string(body)?;
        let script = jsonp_script(callback, &json);

        self.set_header(res, "X-Content-Type-Options", "nosniff")?;
        self.set_header_if_absent(res, "Content-Type", "text/javascript")?;
        self.send(res, script).await
    }

    pub fn location<C: ResponseChannel>(&self, res: &mut C, url: &str) -> ResponseResult<()> {
        self.set_header(res, "Location", url)
    }

    /// Redirect to `url` with an empty body
    pub async fn redirect<C: ResponseChannel>(
        &self,
        res: &mut C,
        url: &str,
        options: RedirectOptions,
    ) -> ResponseResult<()> {
        let status = options.status.unwrap_or(self.config.redirect_status);
        let body = "";
        self.set_status(res, status)?;
        self.location(res, url)?;
        self.set_header(res, "Content-Length", body.len())?;
        self.send(res, body).await
    }

    /// Add `field` to the `Vary` header without duplicating it
    pub fn vary<C: ResponseChannel>(&self, res: &mut C, field: &str) -> ResponseResult<()> {
        let merged = vary::merge(res.header("Vary").as_deref(), field);
        self.set_header(res, "Vary", merged)
    }
}

/// Wrap JSON text in a guarded callback invocation
///
/// U+2028 and U+2029 are valid in JSON strings but end a line in JavaScript.
fn jsonp_script(callback: &str, json: &str) -> String {
    let json = json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029");
    format!("/**/ typeof {callback} === 'function' && {callback}({json});")
}
