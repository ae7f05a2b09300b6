//! Error taxonomy over native engine status codes.
//!
//! Every native call site classifies its raw status immediately; no raw
//! code crosses a module boundary unwrapped.

use std::fmt;

use thiserror::Error;

/// A specialized `Result` for session-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of a native engine status code.
///
/// The mapping is total: a code outside the documented range classifies as
/// [`ErrorKind::UnknownNativeCode`], never silently as a known kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Success.
    Ok,
    /// Invalid parameter to a native call.
    BadArgument,
    /// Scratch buffer capacity insufficient.
    BufferTooSmall,
    /// Engine-internal failure.
    InternalError,
    /// Malformed input packet.
    InvalidPacket,
    /// Requested feature unsupported.
    Unimplemented,
    /// State used after invalidation or in a wrong state.
    InvalidState,
    /// Native memory allocation failure.
    AllocFailed,
    /// Status code outside the documented range.
    UnknownNativeCode,
}

impl ErrorKind {
    /// Classifies a raw native status code.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            -1 => Self::BadArgument,
            -2 => Self::BufferTooSmall,
            -3 => Self::InternalError,
            -4 => Self::InvalidPacket,
            -5 => Self::Unimplemented,
            -6 => Self::InvalidState,
            -7 => Self::AllocFailed,
            _ => Self::UnknownNativeCode,
        }
    }

    /// Returns a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BadArgument => "bad argument",
            Self::BufferTooSmall => "buffer too small",
            Self::InternalError => "internal error",
            Self::InvalidPacket => "invalid packet",
            Self::Unimplemented => "unimplemented",
            Self::InvalidState => "invalid state",
            Self::AllocFailed => "allocation failed",
            Self::UnknownNativeCode => "unknown native error code",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Error returned by session-layer operations.
///
/// Carries the classified kind together with the raw native status it was
/// built from; constructed only via the numeric mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("opus: {kind} (native code {code})")]
pub struct Error {
    kind: ErrorKind,
    code: i32,
}

impl Error {
    /// Builds an error from a raw native status code.
    pub(crate) fn from_code(code: i32) -> Self {
        Self {
            kind: ErrorKind::from_code(code),
            code,
        }
    }

    /// Returns the classified kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the raw native status code.
    pub fn code(&self) -> i32 {
        self.code
    }
}
