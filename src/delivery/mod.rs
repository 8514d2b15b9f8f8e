//! File delivery module
//!
//! Streams a file into a response channel. Each call runs a small state
//! machine:
//!
//! ```text
//! Start -> Stat -> Streaming -> Done
//!            \         \
//!             `---------`----> Failed
//! ```
//!
//! `Stat` records size and modification time as `Content-Length` and
//! `Last-Modified`. `Streaming` opens the file, sets `Content-Type` from the
//! extension once the first read succeeds, and copies chunks into the
//! channel. `Failed` answers 503 with the file error as JSON when no body
//! byte was committed yet, and otherwise cuts the response short.

mod error;
mod source;

pub use error::{FileError, Syscall};
pub use source::{FileMeta, FileSource, LocalFs};

use crate::channel::ResponseChannel;
use crate::config::{Config, DeliveryConfig};
use crate::error::ResponseResult;
use crate::http::{disposition, mime};
use crate::logger::{self, DeliveryLogEntry};
use crate::response::{AttachmentOptions, Body, ResponseWriter};
use chrono::{DateTime, Utc};
use hyper::body::Bytes;
use std::io;
use std::path::Path;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, Take};

/// Headers describing the file, dropped again when delivery fails early
const FILE_HEADERS: [&str; 3] = ["Content-Length", "Last-Modified", "Content-Disposition"];

/// Result of one delivery
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum DeliveryOutcome {
    /// The whole file was streamed
    Done { bytes: u64 },
    /// The file could not be delivered; the channel is finished
    Failed(FileError),
}

impl DeliveryOutcome {
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

enum State {
    Start,
    Stat,
    Streaming(FileMeta),
    Done { bytes: u64 },
    Failed(FileError),
}

/// An open file being streamed; dropped by `teardown` on every exit path
struct FileContext<R> {
    content_type: &'static str,
    /// Size announced as `Content-Length`
    size: u64,
    reader: Take<R>,
}

impl<R: AsyncRead + Unpin> FileContext<R> {
    fn new(path: &Path, meta: FileMeta, reader: R) -> Self {
        Self {
            content_type: mime::get_content_type(path.extension().and_then(|e| e.to_str())),
            size: meta.size,
            // Never send more than the Content-Length announced from stat
            reader: reader.take(meta.size),
        }
    }

    fn teardown(self) {
        drop(self.reader);
    }
}

/// Path-based response delivery (inline download or forced attachment)
#[derive(Debug, Clone)]
pub struct FileDelivery<S = LocalFs> {
    writer: ResponseWriter,
    source: S,
    config: DeliveryConfig,
    /// Delivery log format; `None` disables the delivery log
    log_format: Option<String>,
}

impl FileDelivery<LocalFs> {
    pub fn new(writer: ResponseWriter, config: DeliveryConfig) -> Self {
        Self::with_source(writer, config, LocalFs)
    }

    pub fn from_config(config: &Config) -> Self {
        let mut delivery = Self::new(
            ResponseWriter::new(config.response.clone()),
            config.delivery.clone(),
        );
        if config.logging.delivery_log {
            delivery.log_format = Some(config.logging.log_format.clone());
        }
        delivery
    }
}

impl<S: FileSource> FileDelivery<S> {
    pub const fn with_source(writer: ResponseWriter, config: DeliveryConfig, source: S) -> Self {
        Self {
            writer,
            source,
            config,
            log_format: None,
        }
    }

    /// Enable the delivery log with the given format
    #[must_use]
    pub fn with_log_format(mut self, format: &str) -> Self {
        self.log_format = Some(format.to_string());
        self
    }

    pub const fn writer(&self) -> &ResponseWriter {
        &self.writer
    }

    /// Stream a file inline
    ///
    /// `Err` is reserved for channel failures (client gone, headers already
    /// sent); file errors are answered on the channel and reported as
    /// [`DeliveryOutcome::Failed`].
    pub async fn download<C: ResponseChannel>(
        &self,
        res: &mut C,
        path: impl AsRef<Path>,
    ) -> ResponseResult<DeliveryOutcome> {
        self.send_file(res, path.as_ref(), "download").await
    }

    /// Stream a file with a `Content-Disposition` header
    pub async fn attachment<C: ResponseChannel>(
        &self,
        res: &mut C,
        path: impl AsRef<Path>,
        options: AttachmentOptions<'_>,
    ) -> ResponseResult<DeliveryOutcome> {
        let path = path.as_ref();
        let path_name = path.to_string_lossy();
        let name = options.name.unwrap_or(&path_name);
        let kind = options.disposition.unwrap_or(self.config.disposition);

        self.writer
            .set_header(res, "Content-Disposition", disposition::format(name, kind))?;
        self.send_file(res, path, "attachment").await
    }

    async fn send_file<C: ResponseChannel>(
        &self,
        res: &mut C,
        path: &Path,
        mode: &'static str,
    ) -> ResponseResult<DeliveryOutcome> {
        let started = Instant::now();
        let mut state = State::Start;

        let outcome = loop {
            state = match state {
                State::Start => State::Stat,
                State::Stat => match self.source.stat(path).await {
                    Ok(meta) => {
                        self.apply_metadata(res, &meta)?;
                        State::Streaming(meta)
                    }
                    Err(e) => State::Failed(FileError::from_io(&e, Syscall::Stat, path)),
                },
                State::Streaming(meta) => self.stream(res, path, meta).await?,
                State::Done { bytes } => {
                    self.writer.finish(res).await?;
                    break DeliveryOutcome::Done { bytes };
                }
                State::Failed(err) => {
                    self.fail(res, &err).await?;
                    break DeliveryOutcome::Failed(err);
                }
            };
        };

        self.log_delivery(res, path, mode, &outcome, started);
        Ok(outcome)
    }

    fn apply_metadata<C: ResponseChannel>(&self, res: &mut C, meta: &FileMeta) -> ResponseResult<()> {
        if let Some(modified) = meta.modified {
            self.writer
                .set_header(res, "Last-Modified", http_date(modified))?;
        }
        self.writer.set_header(res, "Content-Length", meta.size)
    }

    /// Open the file and pipe it into the channel
    async fn stream<C: ResponseChannel>(
        &self,
        res: &mut C,
        path: &Path,
        meta: FileMeta,
    ) -> ResponseResult<State> {
        let reader = match self.source.open(path).await {
            Ok(reader) => reader,
            Err(e) => return Ok(State::Failed(FileError::from_io(&e, Syscall::Open, path))),
        };

        let mut ctx = FileContext::new(path, meta, reader);
        let state = self.pipe(res, path, &mut ctx).await;
        ctx.teardown();
        state
    }

    async fn pipe<C: ResponseChannel, R: AsyncRead + Unpin>(
        &self,
        res: &mut C,
        path: &Path,
        ctx: &mut FileContext<R>,
    ) -> ResponseResult<State> {
        if res.is_head() {
            self.writer
                .set_header_if_absent(res, "Content-Type", ctx.content_type)?;
            return Ok(State::Done { bytes: 0 });
        }

        let mut buf = vec![0u8; self.config.chunk_size.max(1)];
        let mut bytes = 0u64;
        let mut typed = false;

        loop {
            let n = match ctx.reader.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => return Ok(State::Failed(FileError::from_io(&e, Syscall::Read, path))),
            };

            // The file is readable: commit to its content type
            if !typed {
                self.writer
                    .set_header_if_absent(res, "Content-Type", ctx.content_type)?;
                typed = true;
            }

            if n == 0 {
                if bytes < ctx.size {
                    let e = io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file shrank during delivery",
                    );
                    return Ok(State::Failed(FileError::from_io(&e, Syscall::Read, path)));
                }
                return Ok(State::Done { bytes });
            }

            res.write(Bytes::copy_from_slice(&buf[..n])).await?;
            bytes += n as u64;
        }
    }

    async fn fail<C: ResponseChannel>(&self, res: &mut C, err: &FileError) -> ResponseResult<()> {
        logger::log_error(&format!("File delivery failed: {err}"));

        if res.headers_sent() {
            // Part of the body is out; the announced length can no longer be met
            return self.writer.finish(res).await;
        }

        for key in FILE_HEADERS {
            self.writer.remove_header(res, key)?;
        }
        self.writer.set_status(res, 503)?;

        let body = if self.config.expose_error_details {
            Body::json(err)?
        } else {
            Body::from(err.redacted())
        };
        self.writer.send(res, body).await
    }

    fn log_delivery<C: ResponseChannel>(
        &self,
        res: &C,
        path: &Path,
        mode: &'static str,
        outcome: &DeliveryOutcome,
        started: Instant,
    ) {
        let Some(format) = self.log_format.as_deref() else {
            return;
        };

        let mut entry = DeliveryLogEntry::new(path.display().to_string(), mode);
        entry.status = res.status();
        entry.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        match outcome {
            DeliveryOutcome::Done { bytes } => entry.bytes = *bytes,
            DeliveryOutcome::Failed(err) => entry.error_code = Some(err.code.clone()),
        }
        logger::log_delivery(&entry, format);
    }
}

/// Format a timestamp as an HTTP-date (`Sun, 06 Nov 1994 08:49:37 GMT`)
fn http_date(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
