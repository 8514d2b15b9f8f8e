//! Response body payloads
//!
//! A body is classified exactly once, when it is converted into [`Body`]. The
//! variant decides both the default content type and how the payload becomes
//! bytes.

use crate::error::ResponseResult;
use hyper::body::Bytes;
use serde::Serialize;
use serde_json::Value;

/// Payload handed to `send`
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No payload; sent as an empty text body
    Empty,
    Text(String),
    /// Number or boolean, sent in its textual form
    Scalar(Scalar),
    Binary(Bytes),
    /// Serialized JSON text, field order as produced by the serializer
    Json(Bytes),
}

/// Numeric or boolean payload
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(serde_json::Number),
    Bool(bool),
}

/// Classification of a body, driving its default content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Text,
    Scalar,
    Binary,
    Json,
}

impl BodyKind {
    /// MIME alias resolved through the MIME lookup
    pub const fn default_type(self) -> &'static str {
        match self {
            Self::Text | Self::Scalar => "text",
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }
}

impl Body {
    /// Serialize any value into a JSON body
    ///
    /// A value serializing to `null` becomes an empty body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ResponseResult<Self> {
        let json = serde_json::to_vec(value)?;
        if json == b"null" {
            return Ok(Self::Empty);
        }
        Ok(Self::Json(Bytes::from(json)))
    }

    pub const fn kind(&self) -> BodyKind {
        match self {
            Self::Empty | Self::Text(_) => BodyKind::Text,
            Self::Scalar(_) => BodyKind::Scalar,
            Self::Binary(_) => BodyKind::Binary,
            Self::Json(_) => BodyKind::Json,
        }
    }

    /// Final payload bytes; text is UTF-8 encoded
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Empty => Bytes::new(),
            Self::Text(text) => Bytes::from(text),
            Self::Scalar(Scalar::Number(n)) => Bytes::from(n.to_string()),
            Self::Scalar(Scalar::Bool(b)) => Bytes::from(b.to_string()),
            Self::Binary(bytes) => bytes,
            Self::Json(json) => json,
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for Body {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Body {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::Number(value.into()))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<f64> for Body {
    /// Non-finite floats have no JSON number form and are sent as text
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or_else(
            || Self::Text(value.to_string()),
            |n| Self::Scalar(Scalar::Number(n)),
        )
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Binary(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(bytes))
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Self::Binary(Bytes::copy_from_slice(bytes))
    }
}

impl From<Value> for Body {
    /// `null` becomes an empty body, everything else is sent as JSON
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            other => Self::Json(Bytes::from(other.to_string())),
        }
    }
}

impl<T: Into<Self>> From<Option<T>> for Body {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
