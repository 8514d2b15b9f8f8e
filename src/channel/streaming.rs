//! Hyper response channel
//!
//! Bridges the writer to a `hyper::Response` whose body is streamed through a
//! bounded queue. The response head is handed to the waiting service future
//! the moment it is committed; body chunks follow as they are written.

use super::{Head, ResponseChannel};
use crate::error::{ResponseError, ResponseResult};
use hyper::body::{Body, Bytes, Frame};
use hyper::{Response, StatusCode};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

/// Number of chunks buffered between the writer and hyper
const BODY_BUFFER: usize = 8;

/// Response body fed by a [`HyperChannel`]
#[derive(Debug)]
pub struct StreamingBody {
    rx: mpsc::Receiver<Bytes>,
}

impl Body for StreamingBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        self.get_mut()
            .rx
            .poll_recv(cx)
            .map(|chunk| chunk.map(|data| Ok(Frame::data(data))))
    }
}

/// Receiving half of a [`HyperChannel`]
#[derive(Debug)]
pub struct PendingResponse {
    rx: oneshot::Receiver<Response<StreamingBody>>,
}

impl PendingResponse {
    /// Wait until the channel commits its head
    ///
    /// Fails with [`ResponseError::ChannelClosed`] if the channel was dropped
    /// without ever writing or ending.
    pub async fn response(self) -> ResponseResult<Response<StreamingBody>> {
        self.rx.await.map_err(|_| ResponseError::ChannelClosed)
    }
}

/// Response channel backed by hyper
///
/// # Examples
/// ```
/// use resfmt::channel::{HyperChannel, ResponseChannel};
/// use hyper::body::Bytes;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (mut channel, pending) = HyperChannel::new(false);
/// tokio::spawn(async move {
///     channel.set_header("Content-Type", "text/plain").unwrap();
///     channel.write(Bytes::from("hi")).await.unwrap();
///     channel.end().await.unwrap();
/// });
/// let response = pending.response().await.unwrap();
/// assert_eq!(response.status(), 200);
/// # }
/// ```
#[derive(Debug)]
pub struct HyperChannel {
    head: Head,
    is_head: bool,
    response_tx: Option<oneshot::Sender<Response<StreamingBody>>>,
    body_tx: Option<mpsc::Sender<Bytes>>,
}

impl HyperChannel {
    /// Create a channel and the handle the service awaits for its response
    pub fn new(is_head: bool) -> (Self, PendingResponse) {
        let (response_tx, rx) = oneshot::channel();
        let channel = Self {
            head: Head::new(),
            is_head,
            response_tx: Some(response_tx),
            body_tx: None,
        };
        (channel, PendingResponse { rx })
    }

    /// Hand status and headers over to hyper
    fn commit(&mut self) -> ResponseResult<()> {
        if self.head.committed {
            return Ok(());
        }
        self.head.committed = true;

        let status = StatusCode::from_u16(self.head.status)
            .map_err(|_| ResponseError::InvalidStatus(self.head.status))?;

        let (tx, rx) = mpsc::channel(BODY_BUFFER);
        let mut response = Response::new(StreamingBody { rx });
        *response.status_mut() = status;
        *response.headers_mut() = self.head.headers.clone();
        self.body_tx = Some(tx);

        let response_tx = self
            .response_tx
            .take()
            .ok_or(ResponseError::ChannelClosed)?;
        response_tx
            .send(response)
            .map_err(|_| ResponseError::ChannelClosed)
    }
}

impl ResponseChannel for HyperChannel {
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
        self.commit()?;
        if self.is_head || chunk.is_empty() {
            return Ok(());
        }
        let tx = self.body_tx.as_ref().ok_or(ResponseError::ChannelClosed)?;
        tx.send(chunk)
            .await
            .map_err(|_| ResponseError::ChannelClosed)
    }

    async fn end(&mut self) -> ResponseResult<()> {
        if self.head.finished {
            return Err(ResponseError::Finished);
        }
        let committed = self.commit();
        self.head.finish()?;
        // Dropping the sender closes the body stream
        self.body_tx = None;
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_head_and_body_reach_hyper() {
        let (mut channel, pending) = HyperChannel::new(false);
        let writer = tokio::spawn(async move {
            channel.set_status(201).unwrap();
            channel.set_header("X-Test", "yes").unwrap();
            channel.write(Bytes::from("hello ")).await.unwrap();
            channel.write(Bytes::from("world")).await.unwrap();
            channel.end().await.unwrap();
        });

        let response = pending.response().await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-test"], "yes");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello world");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_headers_locked_after_first_write() {
        let (mut channel, pending) = HyperChannel::new(false);
        channel.write(Bytes::from("x")).await.unwrap();
        assert!(channel.headers_sent());
        assert!(matches!(
            channel.set_header("X-Late", "1"),
            Err(ResponseError::HeadersSent(_))
        ));
        channel.end().await.unwrap();

        let response = pending.response().await.unwrap();
        assert!(response.headers().get("x-late").is_none());
    }

    #[tokio::test]
    async fn test_end_only_once() {
        let (mut channel, _pending) = HyperChannel::new(false);
        channel.end().await.unwrap();
        assert!(channel.is_finished());
        assert!(matches!(channel.end().await, Err(ResponseError::Finished)));
        assert!(matches!(
            channel.write(Bytes::from("late")).await,
            Err(ResponseError::Finished)
        ));
    }

    #[tokio::test]
    async fn test_head_request_discards_body() {
        let (mut channel, pending) = HyperChannel::new(true);
        channel.set_header("Content-Length", "5").unwrap();
        channel.write(Bytes::from("hello")).await.unwrap();
        channel.end().await.unwrap();

        let response = pending.response().await.unwrap();
        assert_eq!(response.headers()["content-length"], "5");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_receiver_reports_closed() {
        let (mut channel, pending) = HyperChannel::new(false);
        drop(pending);
        assert!(matches!(
            channel.write(Bytes::from("x")).await,
            Err(ResponseError::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn test_invalid_status_is_rejected_on_commit() {
        let (mut channel, _pending) = HyperChannel::new(false);
        channel.set_status(42).unwrap();
        assert!(matches!(
            channel.end().await,
            Err(ResponseError::InvalidStatus(42))
        ));
    }
}
