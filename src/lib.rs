//! Response formatting and file delivery over a raw HTTP response channel.
//!
//! [`ResponseWriter`] turns values into finished responses (`send`, `json`,
//! `jsonp`, `redirect`, header helpers). [`FileDelivery`] streams files into
//! a channel and answers 503 with a JSON error when the file cannot be read.
//!
//! ```
//! use resfmt::{MemoryChannel, ResponseChannel, ResponseWriter};
//!
//! # #[tokio::main]
//! # async fn main() -> resfmt::ResponseResult<()> {
//! let writer = ResponseWriter::default();
//! let mut res = MemoryChannel::new();
//! writer.json(&mut res, &serde_json::json!({"ok": true})).await?;
//!
//! assert_eq!(res.status(), 200);
//! assert_eq!(res.text(), r#"{"ok":true}"#);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod config;
pub mod delivery;
pub mod error;
pub mod http;
pub mod logger;
pub mod response;

pub use channel::{HyperChannel, MemoryChannel, PendingResponse, ResponseChannel, StreamingBody};
pub use config::Config;
pub use delivery::{DeliveryOutcome, FileDelivery, FileError, FileSource, LocalFs, Syscall};
pub use error::{ResponseError, ResponseResult};
pub use http::DispositionType;
pub use response::{AttachmentOptions, Body, JsonpOptions, RedirectOptions, ResponseWriter};
