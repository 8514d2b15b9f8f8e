//! Error descriptor sent as the body of a failed file delivery

use serde::Serialize;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Filesystem operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Syscall {
    Stat,
    Open,
    Read,
}

impl Syscall {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stat => "stat",
            Self::Open => "open",
            Self::Read => "read",
        }
    }
}

/// Raw file error, serialized verbatim into the 503 body
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}, {} '{path}'", .syscall.as_str())]
pub struct FileError {
    /// Symbolic error code (`ENOENT`, `EACCES`, ...)
    pub code: String,
    /// Raw OS error number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<i32>,
    pub syscall: Syscall,
    pub path: String,
    pub message: String,
}

impl FileError {
    pub fn from_io(err: &io::Error, syscall: Syscall, path: &Path) -> Self {
        Self {
            code: error_code(err),
            errno: err.raw_os_error(),
            syscall,
            path: path.display().to_string(),
            message: describe(err),
        }
    }

    /// Body without path and OS details
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": "Service Unavailable",
        })
    }
}

/// OS message without the trailing "(os error N)"
fn describe(err: &io::Error) -> String {
    let message = err.to_string();
    match message.rfind(" (os error") {
        Some(idx) => message[..idx].to_ascii_lowercase(),
        None => message,
    }
}

fn error_code(err: &io::Error) -> String {
    if cfg!(unix) {
        if let Some(code) = err.raw_os_error().and_then(unix_code) {
            return code.to_string();
        }
    }
    let code = match err.kind() {
        io::ErrorKind::NotFound => "ENOENT",
        io::ErrorKind::PermissionDenied => "EACCES",
        io::ErrorKind::AlreadyExists => "EEXIST",
        io::ErrorKind::InvalidInput => "EINVAL",
        io::ErrorKind::Interrupted => "EINTR",
        io::ErrorKind::IsADirectory => "EISDIR",
        io::ErrorKind::UnexpectedEof | io::ErrorKind::Other => "EIO",
        kind => return format!("{kind:?}"),
    };
    code.to_string()
}

/// Error numbers shared by Linux and the BSDs
const fn unix_code(errno: i32) -> Option<&'static str> {
    let code = match errno {
        1 => "EPERM",
        2 => "ENOENT",
        5 => "EIO",
        9 => "EBADF",
        13 => "EACCES",
        20 => "ENOTDIR",
        21 => "EISDIR",
        22 => "EINVAL",
        23 => "ENFILE",
        24 => "EMFILE",
        _ => return None,
    };
    Some(code)
}
