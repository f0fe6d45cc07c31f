// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 nimbus-iot.dev

//! Error types shared by every Nimbus engine.

use core::fmt;

/// Result type for Nimbus operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for Nimbus operations.
///
/// The enum is closed and `Copy`; every public function in the workspace
/// reports failure through it. Three variants are terminators rather than
/// failures: [`Error::EndOfJson`], [`Error::EndOfProperties`] and
/// [`Error::EndOfTwinProperties`] signal that an iteration finished cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input ended before a complete element could be read
    UnexpectedEnd,

    /// Input contains a byte that violates the expected grammar
    UnexpectedChar,

    /// Destination buffer cannot hold the exact output
    NotEnoughSpace,

    /// An argument violates the function contract
    InvalidArgument,

    /// The requested value or conversion is not supported
    NotSupported,

    /// The operation is recognized but not implemented
    NotImplemented,

    /// The requested item does not exist
    ItemNotFound,

    /// Property-bag iteration finished
    EndOfProperties,

    /// The JSON document has been fully consumed
    EndOfJson,

    /// JSON nesting exceeded the 64-level bound
    JsonNestingOverflow,

    /// Operation is not legal for the current reader or writer state
    JsonInvalidState,

    /// A token of a different kind was encountered
    JsonUnexpectedToken,

    /// Received topic does not belong to the attempted protocol family
    TopicNoMatch,

    /// Twin property iteration finished
    EndOfTwinProperties,

    /// Malformed response from the service (HTTP collaborator)
    CorruptResponse,

    /// Misconfigured policy chain (HTTP collaborator)
    PipelineInvalidPolicy,

    /// Caller-supplied deadline expired (HTTP collaborator)
    Canceled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEnd => write!(f, "Unexpected end of input"),
            Error::UnexpectedChar => write!(f, "Unexpected character"),
            Error::NotEnoughSpace => write!(f, "Destination buffer too small"),
            Error::InvalidArgument => write!(f, "Invalid argument"),
            Error::NotSupported => write!(f, "Not supported"),
            Error::NotImplemented => write!(f, "Not implemented"),
            Error::ItemNotFound => write!(f, "Item not found"),
            Error::EndOfProperties => write!(f, "End of properties"),
            Error::EndOfJson => write!(f, "End of JSON document"),
            Error::JsonNestingOverflow => write!(f, "JSON nesting exceeds 64 levels"),
            Error::JsonInvalidState => write!(f, "Invalid JSON reader/writer state"),
            Error::JsonUnexpectedToken => write!(f, "Unexpected JSON token"),
            Error::TopicNoMatch => write!(f, "Topic does not match"),
            Error::EndOfTwinProperties => write!(f, "End of twin properties"),
            Error::CorruptResponse => write!(f, "Corrupt response"),
            Error::PipelineInvalidPolicy => write!(f, "Invalid pipeline policy"),
            Error::Canceled => write!(f, "Operation canceled"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
