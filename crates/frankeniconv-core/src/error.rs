//! Conversion failure taxonomy.

use thiserror::Error;

use crate::errno;
use crate::iconv::ConversionResult;

/// Every way an open/convert/finalize/close call can fail.
///
/// Only [`IconvError::IncompleteSequence`] is recoverable by supplying more
/// input; the other kinds are fatal for the call that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IconvError {
    /// A charset name is not in the registry. Reported by `open`.
    #[error("unsupported charset: {name:?}")]
    UnsupportedCharset { name: String },

    /// Malformed input, or an unrepresentable character under the strict
    /// policy, at `offset` bytes into the call's input. Nothing from the
    /// call is committed.
    #[error("invalid byte sequence at input offset {offset}")]
    InvalidSequence { offset: usize },

    /// The input ends inside a multi-byte sequence. `partial` holds the
    /// output for the first `consumed` bytes, which are committed; resubmit
    /// `input[consumed..]` followed by more data.
    #[error("incomplete byte sequence after {consumed} input bytes")]
    IncompleteSequence {
        consumed: usize,
        partial: ConversionResult,
    },

    /// The descriptor was closed.
    #[error("conversion descriptor is closed")]
    DescriptorClosed,
}

impl IconvError {
    /// POSIX errno a libc `iconv` would set for this failure.
    #[must_use]
    pub const fn errno(&self) -> i32 {
        match self {
            Self::UnsupportedCharset { .. } | Self::IncompleteSequence { .. } => errno::EINVAL,
            Self::InvalidSequence { .. } => errno::EILSEQ,
            Self::DescriptorClosed => errno::EBADF,
        }
    }

    /// Returns true if more input can resolve the failure.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::IncompleteSequence { .. })
    }

    /// Stable short name used in fixtures and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedCharset { .. } => "UnsupportedCharset",
            Self::InvalidSequence { .. } => "InvalidSequence",
            Self::IncompleteSequence { .. } => "IncompleteSequence",
            Self::DescriptorClosed => "DescriptorClosed",
        }
    }
}
