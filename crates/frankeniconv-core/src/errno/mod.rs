//! Error number definitions.
//!
//! The POSIX codes a libc `iconv` reports for each conversion failure.
//! Values match Linux.

/// Bad file descriptor (closed or unknown conversion descriptor).
pub const EBADF: i32 = 9;
/// Invalid argument (unsupported charset, incomplete input sequence).
pub const EINVAL: i32 = 22;
/// Illegal byte sequence.
pub const EILSEQ: i32 = 84;

/// Symbolic name for one of the codes above.
#[must_use]
pub const fn name(errno: i32) -> &'static str {
    match errno {
        EBADF => "EBADF",
        EINVAL => "EINVAL",
        EILSEQ => "EILSEQ",
        _ => "UNKNOWN",
    }
}
