//! Error types for response formatting and file delivery.

use thiserror::Error;

/// Result type alias for response operations.
pub type ResponseResult<T> = Result<T, ResponseError>;

/// Errors surfaced by the response channel and the writer on top of it.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Status or headers were mutated after the head was committed
    #[error("headers already sent, cannot set '{0}'")]
    HeadersSent(String),

    /// A write or end was attempted after the response was finished
    #[error("response already finished")]
    Finished,

    /// The receiving side of the channel went away (client disconnected)
    #[error("response channel closed")]
    ChannelClosed,

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
