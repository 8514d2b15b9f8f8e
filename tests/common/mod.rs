//! Shared helpers for driving a `HyperChannel` end to end.

use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::header::HeaderMap;
use hyper::StatusCode;
use resfmt::HyperChannel;
use std::future::Future;

/// Collected response: head plus the full body
pub struct Collected<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub output: T,
}

impl<T> Collected<T> {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[allow(dead_code)]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Run a handler against a fresh channel while hyper's side reads the body.
pub async fn run<F, Fut, T>(is_head: bool, handler: F) -> Collected<T>
where
    F: FnOnce(HyperChannel) -> Fut + Send,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let (channel, pending) = HyperChannel::new(is_head);
    let task = tokio::spawn(handler(channel));

    let response = pending.response().await.unwrap();
    let (parts, body) = response.into_parts();
    let body = body.collect().await.unwrap().to_bytes();

    Collected {
        status: parts.status,
        headers: parts.headers,
        body,
        output: task.await.unwrap(),
    }
}

/// Write a file into a fresh temporary directory
#[allow(dead_code)]
pub fn fixture(name: &str, contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
