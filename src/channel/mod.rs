//! Response channel module
//!
//! The raw, per-request transport the writer sits on. A channel accepts a
//! status and headers, commits them on the first body write, streams body
//! bytes and is terminated exactly once.

mod memory;
mod streaming;

pub use memory::MemoryChannel;
pub use streaming::{HyperChannel, PendingResponse, StreamingBody};

use crate::error::{ResponseError, ResponseResult};
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use std::future::Future;

/// Transport contract for one in-flight HTTP response
///
/// Header names are case-insensitive. Once the head is committed (first
/// `write` or `end`) status and header mutations fail with
/// [`ResponseError::HeadersSent`]; once ended, writes fail with
/// [`ResponseError::Finished`].
pub trait ResponseChannel: Send {
    fn status(&self) -> u16;

    fn set_status(&mut self, code: u16) -> ResponseResult<()>;

    /// Current value of a header, if set (non-UTF-8 bytes decoded lossily)
    fn header(&self, name: &str) -> Option<String>;

    /// Set a header, replacing any previous value
    fn set_header(&mut self, name: &str, value: &str) -> ResponseResult<()>;

    fn remove_header(&mut self, name: &str) -> ResponseResult<()>;

    /// Whether the request was a HEAD request (body bytes are discarded)
    fn is_head(&self) -> bool;

    fn headers_sent(&self) -> bool;

    fn is_finished(&self) -> bool;

    /// Write a body chunk, committing the head first if needed
    ///
    /// Completes once the chunk has been accepted by the transport, so a slow
    /// reader on the other side slows the writer down.
    fn write(&mut self, chunk: Bytes) -> impl Future<Output = ResponseResult<()>> + Send;

    /// Terminate the response
    fn end(&mut self) -> impl Future<Output = ResponseResult<()>> + Send;
}

/// Status line and header state shared by the channel implementations
#[derive(Debug)]
pub(crate) struct Head {
    pub status: u16,
    pub headers: HeaderMap,
    pub committed: bool,
    pub finished: bool,
}

impl Head {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            committed: false,
            finished: false,
        }
    }

    pub fn set_status(&mut self, code: u16) -> ResponseResult<()> {
        if self.committed {
            return Err(ResponseError::HeadersSent(":status".to_string()));
        }
        self.status = code;
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<String> {
        // obs-text bytes are legal in values; decode lossily so they still count as present
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> ResponseResult<()> {
        if self.committed {
            return Err(ResponseError::HeadersSent(name.to_string()));
        }
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ResponseError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ResponseError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    pub fn remove_header(&mut self, name: &str) -> ResponseResult<()> {
        if self.committed {
            return Err(ResponseError::HeadersSent(name.to_string()));
        }
        self.headers.remove(name);
        Ok(())
    }

    /// Mark the response as ended, failing on a second termination
    pub fn finish(&mut self) -> ResponseResult<()> {
        if self.finished {
            return Err(ResponseError::Finished);
        }
        self.committed = true;
        self.finished = true;
        Ok(())
    }
}
