//! In-memory response channel
//!
//! Records everything written to it. Useful for buffering a whole response
//! before handing it to hyper, and for asserting on what the writer produced.

use super::{Head, ResponseChannel};
use crate::error::{ResponseError, ResponseResult};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::{Response, StatusCode};

/// Buffered response channel
#[derive(Debug)]
pub struct MemoryChannel {
    head: Head,
    is_head: bool,
    body: Vec<u8>,
    end_calls: usize,
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self {
            head: Head::new(),
            is_head: false,
            body: Vec::new(),
            end_calls: 0,
        }
    }

    /// Channel for a HEAD request: body writes are discarded
    pub fn for_head_request() -> Self {
        Self {
            is_head: true,
            ..Self::new()
        }
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, lossy
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Number of successful `end` calls (at most one)
    pub const fn end_calls(&self) -> usize {
        self.end_calls
    }

    /// Convert the recorded response into a hyper response
    pub fn into_response(self) -> ResponseResult<Response<Full<Bytes>>> {
        let status = StatusCode::from_u16(self.head.status)
            .map_err(|_| ResponseError::InvalidStatus(self.head.status))?;
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = status;
        *response.headers_mut() = self.head.headers;
        Ok(response)
    }
}

impl ResponseChannel for MemoryChannel {
    fn status(&self) -> u16 {
        self.head.status
    }

    fn set_status(&mut self, code: u16) -> ResponseResult<()> {
        self.head.set_status(code)
    }

    fn header(&self, name: &str) -> Option<String> {
        self.head.header(name)
    }

    fn set_header(&mut self, name: &str, value: &str) -> ResponseResult<()> {
        self.head.set_header(name, value)
    }

    fn remove_header(&mut self, name: &str) -> ResponseResult<()> {
        self.head.remove_header(name)
    }

    fn is_head(&self) -> bool {
        self.is_head
    }

    fn headers_sent(&self) -> bool {
        self.head.committed
    }

    fn is_finished(&self) -> bool {
        self.head.finished
    }

    async fn write(&mut self, chunk: Bytes) -> ResponseResult<()> {
        if self.head.finished {
            return Err(ResponseError::Finished);
        }
        self.head.committed = true;
        if !self.is_head {
            self.body.extend_from_slice(&chunk);
        }
        Ok(())
    }

    async fn end(&mut self) -> ResponseResult<()> {
        self.head.finish()?;
        self.end_calls += 1;
        Ok(())
    }
}
